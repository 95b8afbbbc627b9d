//! Append-only transaction log
//!
//! This module provides the `TransactionLog`, the single source of truth for
//! committed transactions. Entries are totally ordered by a strictly
//! increasing ordinal assigned at append time; once appended a transaction is
//! never edited, removed, or reordered.
//!
//! # Design
//!
//! The log is a `Vec` behind an `RwLock` (ordinal = index), plus a `DashMap`
//! index from transaction id to ordinal for O(1) verification lookups.
//! Appends take the write lock for the duration of the duplicate check and
//! push, so ordinals reflect commit order under contention. Reads are range
//! scans over ordinals, which is what makes bookmark pagination stable under
//! concurrent appends: new entries only ever land past the end of any range a
//! reader has already observed.

use crate::types::{LedgerError, Transaction};
use dashmap::DashMap;
use std::sync::RwLock;

/// Result of a single ordinal-range scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    /// Matching transactions, oldest first
    pub records: Vec<Transaction>,
    /// Ordinal to resume from, or None if the scan reached the end of the log
    pub resume_from: Option<u64>,
}

/// Append-only, totally ordered transaction log
///
/// # Thread Safety
///
/// Safe to share across threads. Appends serialize on the internal write
/// lock; reads take a shared lock only for the instant needed to copy the
/// requested range.
#[derive(Debug, Default)]
pub struct TransactionLog {
    entries: RwLock<Vec<Transaction>>,
    by_id: DashMap<String, u64>,
}

impl TransactionLog {
    /// Create a new empty TransactionLog
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            by_id: DashMap::new(),
        }
    }

    /// Append a transaction, assigning it the next ordinal
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if a transaction with the same id is already in
    /// the log. A collision is a hard error, never silently retried: derived
    /// ids include a per-engine nonce, so it indicates either an
    /// id-construction bug or a replayed commit.
    pub fn append(&self, tx: Transaction) -> Result<u64, LedgerError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::conflict("append"))?;
        if self.by_id.contains_key(&tx.tx_id) {
            return Err(LedgerError::duplicate_id(&tx.tx_id));
        }
        let ordinal = entries.len() as u64;
        self.by_id.insert(tx.tx_id.clone(), ordinal);
        entries.push(tx);
        Ok(ordinal)
    }

    /// Whether a transaction with this id is already in the log
    pub fn contains(&self, tx_id: &str) -> bool {
        self.by_id.contains_key(tx_id)
    }

    /// Look up a transaction by its id
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if no transaction has this id.
    pub fn get_by_id(&self, tx_id: &str) -> Result<Transaction, LedgerError> {
        let ordinal = self
            .by_id
            .get(tx_id)
            .map(|entry| *entry.value())
            .ok_or_else(|| LedgerError::transaction_not_found(tx_id))?;
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::conflict("get_by_id"))?;
        entries
            .get(ordinal as usize)
            .cloned()
            .ok_or_else(|| LedgerError::transaction_not_found(tx_id))
    }

    /// Number of committed transactions
    pub fn len(&self) -> u64 {
        self.entries.read().map(|e| e.len() as u64).unwrap_or(0)
    }

    /// Whether the log holds no transactions
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scan forward from an ordinal, oldest first
    ///
    /// Collects up to `limit` transactions starting at ordinal `from`
    /// (inclusive), restricted to those touching `filter` when one is given
    /// (sender or recipient match). `resume_from` is set only when the limit
    /// was reached before the end of the log, so a short page always means
    /// true end-of-data.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a consistent read view could not be obtained.
    pub fn scan(
        &self,
        filter: Option<&str>,
        from: u64,
        limit: usize,
    ) -> Result<ScanPage, LedgerError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::conflict("scan"))?;
        let mut records = Vec::new();
        let mut resume_from = None;

        let start = from.min(entries.len() as u64) as usize;
        for (offset, tx) in entries[start..].iter().enumerate() {
            if records.len() == limit {
                resume_from = Some((start + offset) as u64);
                break;
            }
            let matches = match filter {
                Some(username) => tx.touches(username),
                None => true,
            };
            if matches {
                records.push(tx.clone());
            }
        }

        Ok(ScanPage {
            records,
            resume_from,
        })
    }

    /// Clone of the full log, oldest first
    ///
    /// Used by backup and restore validation; callers that need a consistent
    /// ledger-wide view hold the commit lock around the call.
    pub fn all(&self) -> Vec<Transaction> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }

    /// Replace the entire log contents
    ///
    /// Used by restore after snapshot validation has passed; callers hold the
    /// commit lock so no append can interleave with the swap.
    pub(crate) fn replace_all(&self, transactions: Vec<Transaction>) -> Result<(), LedgerError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::conflict("restore"))?;
        self.by_id.clear();
        for (ordinal, tx) in transactions.iter().enumerate() {
            self.by_id.insert(tx.tx_id.clone(), ordinal as u64);
        }
        *entries = transactions;
        Ok(())
    }
}
