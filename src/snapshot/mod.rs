//! Backup and restore of complete ledger state
//!
//! A `Snapshot` is a serializable, point-in-time copy of every account and
//! the full transaction log, sufficient to fully reconstruct the ledger.
//! `backup` clones state under the engine's commit lock, so it never observes
//! a half-applied transfer. `restore` is admin-gated, validates the snapshot
//! by replaying the log against the declared balances, and swaps state
//! all-or-nothing: a failed validation leaves prior state untouched.
//!
//! Replay validation doubles as the recovery path after suspected
//! corruption: balances are strictly a materialized view of the log, so any
//! snapshot whose accounts cannot be rebuilt from its transactions is
//! rejected.

use crate::core::LedgerEngine;
use crate::types::{Account, LedgerError, Role, Transaction, TxKind, SYSTEM_ACCOUNT};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Complete, consistent serialization of ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All accounts, sorted by username
    pub accounts: Vec<Account>,

    /// The full transaction log in ordinal order
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    /// Validate internal consistency
    ///
    /// Checks, in order:
    /// - no duplicate usernames
    /// - no duplicate transaction ids
    /// - every amount strictly positive
    /// - mints carry the `SYSTEM` sentinel as sender; transfers never do
    /// - no self-transfers
    /// - replaying the log never takes a balance negative and only touches
    ///   declared accounts
    /// - replayed balances reconcile exactly with the declared balances
    ///
    /// # Errors
    ///
    /// Returns `InvalidSnapshot` with the first failing check as the reason.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let mut balances: HashMap<&str, u64> = HashMap::with_capacity(self.accounts.len());
        for account in &self.accounts {
            if account.username == SYSTEM_ACCOUNT {
                return Err(LedgerError::invalid_snapshot(format!(
                    "{SYSTEM_ACCOUNT} is a reserved name, not an account"
                )));
            }
            if balances.insert(account.username.as_str(), 0).is_some() {
                return Err(LedgerError::invalid_snapshot(format!(
                    "duplicate account {}",
                    account.username
                )));
            }
        }

        let mut seen_ids: HashSet<&str> = HashSet::with_capacity(self.transactions.len());
        for tx in &self.transactions {
            if !seen_ids.insert(tx.tx_id.as_str()) {
                return Err(LedgerError::invalid_snapshot(format!(
                    "duplicate transaction id {}",
                    tx.tx_id
                )));
            }
            if tx.amount == 0 {
                return Err(LedgerError::invalid_snapshot(format!(
                    "transaction {} has a zero amount",
                    tx.tx_id
                )));
            }
            match tx.kind {
                TxKind::Mint => {
                    if tx.from != SYSTEM_ACCOUNT {
                        return Err(LedgerError::invalid_snapshot(format!(
                            "mint {} is not from {SYSTEM_ACCOUNT}",
                            tx.tx_id
                        )));
                    }
                }
                TxKind::Transfer => {
                    if tx.from == SYSTEM_ACCOUNT {
                        return Err(LedgerError::invalid_snapshot(format!(
                            "transfer {} is from {SYSTEM_ACCOUNT}",
                            tx.tx_id
                        )));
                    }
                    if tx.from == tx.to {
                        return Err(LedgerError::invalid_snapshot(format!(
                            "transfer {} is a self-transfer",
                            tx.tx_id
                        )));
                    }
                    let sender = balances.get_mut(tx.from.as_str()).ok_or_else(|| {
                        LedgerError::invalid_snapshot(format!(
                            "transaction {} debits unknown account {}",
                            tx.tx_id, tx.from
                        ))
                    })?;
                    *sender = sender.checked_sub(tx.amount).ok_or_else(|| {
                        LedgerError::invalid_snapshot(format!(
                            "transaction {} takes {} negative",
                            tx.tx_id, tx.from
                        ))
                    })?;
                }
            }
            let recipient = balances.get_mut(tx.to.as_str()).ok_or_else(|| {
                LedgerError::invalid_snapshot(format!(
                    "transaction {} credits unknown account {}",
                    tx.tx_id, tx.to
                ))
            })?;
            *recipient = recipient.checked_add(tx.amount).ok_or_else(|| {
                LedgerError::invalid_snapshot(format!(
                    "transaction {} overflows {}",
                    tx.tx_id, tx.to
                ))
            })?;
        }

        for account in &self.accounts {
            let replayed = balances[account.username.as_str()];
            if replayed != account.balance {
                return Err(LedgerError::invalid_snapshot(format!(
                    "balance mismatch for {}: log replays to {}, snapshot says {}",
                    account.username, replayed, account.balance
                )));
            }
        }

        Ok(())
    }
}

/// Backup and restore over shared ledger state
#[derive(Debug, Clone)]
pub struct SnapshotService {
    engine: Arc<LedgerEngine>,
}

impl SnapshotService {
    /// Create a snapshot service over a shared engine
    pub fn new(engine: Arc<LedgerEngine>) -> Self {
        Self { engine }
    }

    /// Produce a consistent point-in-time snapshot
    ///
    /// Takes the commit lock for the duration of the clone, so concurrent
    /// mutations wait briefly but a half-applied transfer is never captured.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a consistent view could not be obtained.
    pub fn backup(&self) -> Result<Snapshot, LedgerError> {
        let _guard = self.engine.commit_guard("backup")?;
        let snapshot = Snapshot {
            accounts: self.engine.accounts().all_accounts(),
            transactions: self.engine.log().all(),
        };
        tracing::info!(
            accounts = snapshot.accounts.len(),
            transactions = snapshot.transactions.len(),
            "backup taken"
        );
        Ok(snapshot)
    }

    /// Replace all ledger state with the snapshot's contents
    ///
    /// Requires the caller to be an existing admin account. Validation runs
    /// before any state is touched; the swap happens under the commit lock,
    /// excluding every other mutation for its duration.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the caller is unknown, `Unauthorized` if
    /// the caller is not an admin, or `InvalidSnapshot` if validation fails.
    /// On any error the prior ledger state is untouched.
    pub fn restore(&self, caller: &str, snapshot: &Snapshot) -> Result<(), LedgerError> {
        let _guard = self.engine.commit_guard("restore")?;

        let account = self.engine.accounts().get(caller)?;
        if account.role != Role::Admin {
            return Err(LedgerError::unauthorized(caller, "restore"));
        }
        snapshot.validate()?;

        self.engine
            .log()
            .replace_all(snapshot.transactions.clone())?;
        self.engine.accounts().replace_all(snapshot.accounts.clone());

        tracing::info!(
            caller,
            accounts = snapshot.accounts.len(),
            transactions = snapshot.transactions.len(),
            "ledger state restored"
        );
        Ok(())
    }
}
