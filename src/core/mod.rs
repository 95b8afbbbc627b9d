//! Ledger core: account storage, the append-only transaction log, and the
//! mutation engine that coordinates them.

pub mod account_store;
pub mod engine;
pub mod transaction_log;

pub use account_store::AccountStore;
pub use engine::LedgerEngine;
pub use transaction_log::{ScanPage, TransactionLog};
