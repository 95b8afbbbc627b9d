//! Error types for the VAP ledger
//!
//! This module defines all errors the ledger core can surface. Every variant
//! except `Io` and `Serialization` is recoverable at the API boundary: the
//! rejected operation leaves balances and the transaction log exactly as they
//! were before the call.
//!
//! # Error Categories
//!
//! - **Lookup errors**: unknown account or transaction id
//! - **Validation errors**: invalid amount, self-transfer, insufficient funds,
//!   missing authorization
//! - **Integrity errors**: duplicate transaction id, invalid snapshot,
//!   balance overflow
//! - **Infrastructure errors**: lock contention, file I/O, serialization

use thiserror::Error;

/// Main error type for the ledger core
///
/// Each variant carries enough context to surface a useful reason to the
/// caller at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The referenced account does not exist
    #[error("account {username} does not exist")]
    AccountNotFound {
        /// Username that was not found
        username: String,
    },

    /// The referenced transaction does not exist
    #[error("transaction {tx_id} not found")]
    TransactionNotFound {
        /// Transaction id that was not found
        tx_id: String,
    },

    /// An account with this username already exists
    #[error("account {username} already exists")]
    AccountExists {
        /// Username that collided
        username: String,
    },

    /// Amount is zero, negative, fractional, or out of range
    ///
    /// Amounts are whole VAP units; fractional input is rejected rather than
    /// silently truncated.
    #[error("invalid amount '{amount}': amounts must be positive whole VAP units")]
    InvalidAmount {
        /// The offending amount as supplied by the caller
        amount: String,
    },

    /// Sender and recipient are the same account
    #[error("account {username} cannot transfer to itself")]
    SelfTransfer {
        /// The account that attempted the self-transfer
        username: String,
    },

    /// The sender's balance does not cover the requested amount
    #[error("insufficient funds for {username}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Sending account username
        username: String,
        /// Current balance in whole VAP units
        balance: u64,
        /// Requested amount in whole VAP units
        requested: u64,
    },

    /// The caller's role does not permit the operation
    #[error("{username} is not authorized to {operation}")]
    Unauthorized {
        /// Caller username
        username: String,
        /// Operation that was refused
        operation: String,
    },

    /// A transaction with this id is already in the log
    ///
    /// Derived ids include a per-engine nonce, so a collision indicates
    /// either an id-construction bug or a replayed commit. It is a hard
    /// error, never silently retried.
    #[error("duplicate transaction id {tx_id}")]
    DuplicateId {
        /// The colliding transaction id
        tx_id: String,
    },

    /// Snapshot failed validation during restore
    ///
    /// Restore is all-or-nothing: a failed validation leaves prior ledger
    /// state untouched.
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot {
        /// Why the snapshot was rejected
        reason: String,
    },

    /// Pagination bookmark could not be decoded
    ///
    /// Bookmarks are opaque tokens issued by the ledger; anything else is
    /// rejected.
    #[error("invalid pagination bookmark '{token}'")]
    InvalidBookmark {
        /// The undecodable token
        token: String,
    },

    /// Lock contention that could not complete
    #[error("ledger is busy: could not complete {operation}")]
    Conflict {
        /// Operation that could not acquire a consistent view
        operation: String,
    },

    /// A balance update would overflow
    #[error("balance overflow in {operation} for {username}")]
    Overflow {
        /// Operation that would overflow
        operation: String,
        /// Affected account username
        username: String,
    },

    /// I/O error while reading or writing a snapshot file
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// Snapshot (de)serialization failure
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the serialization error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::Serialization {
            message: error.to_string(),
        }
    }
}

// Helper constructors for common errors

impl LedgerError {
    /// Create an AccountNotFound error
    pub fn account_not_found(username: &str) -> Self {
        LedgerError::AccountNotFound {
            username: username.to_string(),
        }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(tx_id: &str) -> Self {
        LedgerError::TransactionNotFound {
            tx_id: tx_id.to_string(),
        }
    }

    /// Create an AccountExists error
    pub fn account_exists(username: &str) -> Self {
        LedgerError::AccountExists {
            username: username.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create a SelfTransfer error
    pub fn self_transfer(username: &str) -> Self {
        LedgerError::SelfTransfer {
            username: username.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(username: &str, balance: u64, requested: u64) -> Self {
        LedgerError::InsufficientFunds {
            username: username.to_string(),
            balance,
            requested,
        }
    }

    /// Create an Unauthorized error
    pub fn unauthorized(username: &str, operation: &str) -> Self {
        LedgerError::Unauthorized {
            username: username.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Create a DuplicateId error
    pub fn duplicate_id(tx_id: &str) -> Self {
        LedgerError::DuplicateId {
            tx_id: tx_id.to_string(),
        }
    }

    /// Create an InvalidSnapshot error
    pub fn invalid_snapshot(reason: impl Into<String>) -> Self {
        LedgerError::InvalidSnapshot {
            reason: reason.into(),
        }
    }

    /// Create an InvalidBookmark error
    pub fn invalid_bookmark(token: &str) -> Self {
        LedgerError::InvalidBookmark {
            token: token.to_string(),
        }
    }

    /// Create a Conflict error
    pub fn conflict(operation: &str) -> Self {
        LedgerError::Conflict {
            operation: operation.to_string(),
        }
    }

    /// Create an Overflow error
    pub fn overflow(operation: &str, username: &str) -> Self {
        LedgerError::Overflow {
            operation: operation.to_string(),
            username: username.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::account_not_found(
        LedgerError::account_not_found("ghost"),
        "account ghost does not exist"
    )]
    #[case::transaction_not_found(
        LedgerError::transaction_not_found("deadbeef"),
        "transaction deadbeef not found"
    )]
    #[case::account_exists(
        LedgerError::account_exists("student1"),
        "account student1 already exists"
    )]
    #[case::invalid_amount(
        LedgerError::invalid_amount("10.5"),
        "invalid amount '10.5': amounts must be positive whole VAP units"
    )]
    #[case::self_transfer(
        LedgerError::self_transfer("student1"),
        "account student1 cannot transfer to itself"
    )]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds("student1", 100, 500),
        "insufficient funds for student1: balance 100, requested 500"
    )]
    #[case::unauthorized(
        LedgerError::unauthorized("merchant1", "mint"),
        "merchant1 is not authorized to mint"
    )]
    #[case::duplicate_id(
        LedgerError::duplicate_id("cafe01"),
        "duplicate transaction id cafe01"
    )]
    #[case::invalid_snapshot(
        LedgerError::invalid_snapshot("balance mismatch for admin1"),
        "invalid snapshot: balance mismatch for admin1"
    )]
    #[case::invalid_bookmark(
        LedgerError::invalid_bookmark("???"),
        "invalid pagination bookmark '???'"
    )]
    #[case::conflict(
        LedgerError::conflict("transfer"),
        "ledger is busy: could not complete transfer"
    )]
    #[case::overflow(
        LedgerError::overflow("credit", "admin1"),
        "balance overflow in credit for admin1"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_error = serde_json::from_str::<u32>("not json").unwrap_err();
        let error: LedgerError = parse_error.into();
        assert!(matches!(error, LedgerError::Serialization { .. }));
    }
}
