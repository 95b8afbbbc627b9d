//! Public transaction verification
//!
//! Anyone holding a transaction id (for example from a printed receipt) can
//! look up the committed record and check its fields. This is a pure read
//! with no side effects and no authorization requirement: public audit is an
//! explicit design goal.

use crate::core::TransactionLog;
use crate::types::{LedgerError, Transaction};
use std::sync::Arc;

/// Read-only lookup of committed transactions by identifier
#[derive(Debug, Clone)]
pub struct VerificationService {
    log: Arc<TransactionLog>,
}

impl VerificationService {
    /// Create a verification service over a shared transaction log
    pub fn new(log: Arc<TransactionLog>) -> Self {
        Self { log }
    }

    /// Look up a committed transaction by its id
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if no transaction has this id.
    pub fn verify(&self, tx_id: &str) -> Result<Transaction, LedgerError> {
        self.log.get_by_id(tx_id)
    }
}
