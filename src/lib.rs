//! VAP Ledger Core
//!
//! # Overview
//!
//! This library is the ledger/wallet core behind the VAP campus-currency
//! dashboards: account balances, an append-only transaction log, mint and
//! transfer state transitions, bookmark-based pagination, public transaction
//! verification, and point-in-time backup/restore. It is safe to call from
//! many concurrent clients.
//!
//! HTTP routing, authentication, and UI rendering are external collaborators;
//! the core consumes an already-resolved principal and enforces the
//! ledger-level invariants itself.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Transaction, Amount, errors)
//! - [`core`] - Ledger state and mutation logic:
//!   - [`core::account_store`] - Balance and role per username
//!   - [`core::transaction_log`] - Append-only, totally ordered commit log
//!   - [`core::engine`] - Mint/transfer orchestration and invariants
//! - [`query`] - Read-side services:
//!   - [`query::pagination`] - Opaque-bookmark paging over the log
//!   - [`query::verify`] - Public lookup by transaction id
//! - [`snapshot`] - Consistent backup and all-or-nothing restore
//! - [`cli`] - Arguments for the offline snapshot audit tool
//!
//! # Guarantees
//!
//! - Balances never go negative under any interleaving of transfers
//! - A balance always equals the sum of signed amounts in the log
//! - Committed transactions are never edited, removed, or reordered
//! - A rejected operation leaves ledger state exactly as before the call
//!
//! # Example
//!
//! ```
//! use vap_ledger::{Amount, LedgerEngine, Role};
//!
//! let engine = LedgerEngine::new();
//! engine.register("admin1", Role::Admin)?;
//! engine.register("student1", Role::Student)?;
//!
//! engine.mint("admin1", Amount::new(1000)?)?;
//! let tx = engine.transfer("admin1", "student1", Amount::new(100)?)?;
//!
//! assert_eq!(engine.balance("student1")?, 100);
//! assert_eq!(engine.log().get_by_id(&tx.tx_id)?, tx);
//! # Ok::<(), vap_ledger::LedgerError>(())
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod query;
pub mod snapshot;
pub mod types;

pub use crate::core::{AccountStore, LedgerEngine, TransactionLog};
pub use query::{Page, Paginator, VerificationService, DEFAULT_PAGE_SIZE};
pub use snapshot::{Snapshot, SnapshotService};
pub use types::{Account, Amount, LedgerError, Role, Transaction, TxId, TxKind, SYSTEM_ACCOUNT};
