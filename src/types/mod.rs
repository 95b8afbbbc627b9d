//! Core data types for the VAP ledger
//!
//! This module contains account and transaction types plus the error
//! taxonomy used throughout the ledger core.

pub mod account;
pub mod error;
pub mod transaction;

pub use account::{Account, Role};
pub use error::LedgerError;
pub use transaction::{Amount, Transaction, TxId, TxKind, SYSTEM_ACCOUNT};
