//! Ledger mutation engine
//!
//! This module provides the `LedgerEngine` that orchestrates mint and
//! transfer commits by coordinating the `AccountStore` and `TransactionLog`.
//!
//! The engine enforces the ledger-level invariants:
//! - only admin accounts mint (checked here, not at the transport boundary)
//! - amounts are strictly positive whole units
//! - no self-transfers
//! - balances never go negative
//! - a commit updates the balances and appends to the log as one indivisible
//!   unit; a rejected operation has no observable effect
//!
//! # Concurrency
//!
//! All mutations serialize on a single commit mutex. A commit first validates
//! everything against the locked state (existence, role, funds, overflow,
//! duplicate id) and only then applies the balance updates and the log
//! append, so no partially-applied transfer is ever observable. Reads
//! (balance, scan, verify) do not take the commit lock. Transactions are
//! committed in the order their critical sections complete; log ordinals
//! reflect commit order, not request arrival.

use crate::core::{AccountStore, TransactionLog};
use crate::types::{Account, Amount, LedgerError, Role, Transaction, TxKind, SYSTEM_ACCOUNT};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

/// Orchestrates mint/transfer state transitions over shared ledger state
///
/// Share across threads with `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct LedgerEngine {
    accounts: Arc<AccountStore>,
    log: Arc<TransactionLog>,
    commit: Mutex<()>,
    nonce: AtomicU64,
}

impl LedgerEngine {
    /// Create a new engine with empty ledger state
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(AccountStore::new()),
            log: Arc::new(TransactionLog::new()),
            commit: Mutex::new(()),
            nonce: AtomicU64::new(0),
        }
    }

    /// Shared handle to the account store
    pub fn accounts(&self) -> &Arc<AccountStore> {
        &self.accounts
    }

    /// Shared handle to the transaction log
    pub fn log(&self) -> &Arc<TransactionLog> {
        &self.log
    }

    /// Register a new account
    ///
    /// Called by the external registration collaborator; the ledger core does
    /// not authenticate, it only records the resolved principal and role.
    ///
    /// # Errors
    ///
    /// Returns `AccountExists` if the username is taken or reserved.
    pub fn register(&self, username: &str, role: Role) -> Result<Account, LedgerError> {
        let account = self.accounts.create(username, role)?;
        tracing::info!(username, role = %role, "account registered");
        Ok(account)
    }

    /// Current balance of an account in whole VAP units
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub fn balance(&self, username: &str) -> Result<u64, LedgerError> {
        self.accounts.balance(username)
    }

    /// Mint new currency into an admin account
    ///
    /// Credits `admin_username` and appends a mint transaction with the
    /// `SYSTEM` sentinel as sender. "Only admins mint" is a ledger-level
    /// invariant, so the role check happens here regardless of any check at
    /// the transport boundary.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist,
    /// `Unauthorized` if its role is not admin, `Overflow` if the credit
    /// would overflow, or `DuplicateId` on an id collision.
    pub fn mint(&self, admin_username: &str, amount: Amount) -> Result<Transaction, LedgerError> {
        let _guard = self.commit_guard("mint")?;

        let account = self.accounts.get(admin_username)?;
        if account.role != Role::Admin {
            return Err(LedgerError::unauthorized(admin_username, "mint"));
        }
        account
            .balance
            .checked_add(amount.units())
            .ok_or_else(|| LedgerError::overflow("mint", admin_username))?;

        let tx = self.build_transaction(SYSTEM_ACCOUNT, admin_username, amount, TxKind::Mint)?;

        // Apply phase: validated above, nothing below can reject
        self.accounts.credit(admin_username, amount.units())?;
        let ordinal = self.log.append(tx.clone())?;

        tracing::info!(
            tx_id = %tx.tx_id,
            to = admin_username,
            amount = amount.units(),
            ordinal,
            "mint committed"
        );
        Ok(tx)
    }

    /// Transfer currency between two existing accounts
    ///
    /// The balance read, the funds check, both balance mutations, and the log
    /// append form one critical section with respect to any other mutation;
    /// either all of them happen or none do.
    ///
    /// # Errors
    ///
    /// Returns `SelfTransfer` if sender and recipient are the same,
    /// `AccountNotFound` if either account does not exist,
    /// `InsufficientFunds` if the sender's balance does not cover the amount,
    /// `Overflow` if the recipient's credit would overflow, or `DuplicateId`
    /// on an id collision.
    pub fn transfer(&self, from: &str, to: &str, amount: Amount) -> Result<Transaction, LedgerError> {
        let _guard = self.commit_guard("transfer")?;

        if from == to {
            return Err(LedgerError::self_transfer(from));
        }
        let sender = self.accounts.get(from)?;
        let recipient = self.accounts.get(to)?;

        if sender.balance < amount.units() {
            return Err(LedgerError::insufficient_funds(
                from,
                sender.balance,
                amount.units(),
            ));
        }
        recipient
            .balance
            .checked_add(amount.units())
            .ok_or_else(|| LedgerError::overflow("transfer", to))?;

        let tx = self.build_transaction(from, to, amount, TxKind::Transfer)?;

        // Apply phase: validated above, nothing below can reject
        self.accounts.debit(from, amount.units())?;
        self.accounts.credit(to, amount.units())?;
        let ordinal = self.log.append(tx.clone())?;

        tracing::info!(
            tx_id = %tx.tx_id,
            from,
            to,
            amount = amount.units(),
            ordinal,
            "transfer committed"
        );
        Ok(tx)
    }

    /// Acquire the commit lock, used by every mutating operation
    ///
    /// Backup and restore also take this guard so a snapshot never observes a
    /// half-applied commit.
    pub(crate) fn commit_guard(&self, operation: &str) -> Result<MutexGuard<'_, ()>, LedgerError> {
        self.commit
            .lock()
            .map_err(|_| LedgerError::conflict(operation))
    }

    /// Build a transaction with a commit timestamp and derived id
    ///
    /// Fails with `DuplicateId` if the derived id already exists in the log,
    /// before any state has been touched.
    fn build_transaction(
        &self,
        from: &str,
        to: &str,
        amount: Amount,
        kind: TxKind,
    ) -> Result<Transaction, LedgerError> {
        let timestamp = now_seconds();
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        let tx_id = Transaction::derive_id(from, to, amount.units(), timestamp, nonce);
        if self.log.contains(&tx_id) {
            return Err(LedgerError::duplicate_id(&tx_id));
        }
        Ok(Transaction {
            tx_id,
            from: from.to_string(),
            to: to.to_string(),
            amount: amount.units(),
            timestamp,
            kind,
        })
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Seconds since the Unix epoch at the moment of commit
fn now_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_accounts() -> LedgerEngine {
        let engine = LedgerEngine::new();
        engine.register("admin1", Role::Admin).unwrap();
        engine.register("student1", Role::Student).unwrap();
        engine.register("merchant1", Role::Merchant).unwrap();
        engine
    }

    fn amount(units: u64) -> Amount {
        Amount::new(units).unwrap()
    }

    #[test]
    fn test_mint_credits_admin_and_logs() {
        let engine = engine_with_accounts();

        let tx = engine.mint("admin1", amount(1000)).unwrap();

        assert_eq!(tx.from, SYSTEM_ACCOUNT);
        assert_eq!(tx.to, "admin1");
        assert_eq!(tx.amount, 1000);
        assert_eq!(tx.kind, TxKind::Mint);
        assert!(tx.timestamp > 0);

        assert_eq!(engine.balance("admin1").unwrap(), 1000);
        assert_eq!(engine.log().len(), 1);
        assert_eq!(engine.log().get_by_id(&tx.tx_id).unwrap(), tx);
    }

    #[test]
    fn test_mint_by_non_admin_rejected() {
        let engine = engine_with_accounts();

        let result = engine.mint("merchant1", amount(100));
        assert_eq!(
            result.unwrap_err(),
            LedgerError::unauthorized("merchant1", "mint")
        );

        assert_eq!(engine.balance("merchant1").unwrap(), 0);
        assert!(engine.log().is_empty());
    }

    #[test]
    fn test_mint_unknown_account_rejected() {
        let engine = LedgerEngine::new();
        let result = engine.mint("ghost", amount(100));
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::AccountNotFound { .. }
        ));
    }

    #[test]
    fn test_transfer_moves_funds_and_logs() {
        let engine = engine_with_accounts();
        engine.mint("admin1", amount(1000)).unwrap();

        let tx = engine.transfer("admin1", "student1", amount(100)).unwrap();

        assert_eq!(tx.from, "admin1");
        assert_eq!(tx.to, "student1");
        assert_eq!(tx.amount, 100);
        assert_eq!(tx.kind, TxKind::Transfer);

        assert_eq!(engine.balance("admin1").unwrap(), 900);
        assert_eq!(engine.balance("student1").unwrap(), 100);
        assert_eq!(engine.log().len(), 2);
    }

    #[test]
    fn test_transfer_insufficient_funds_leaves_state_untouched() {
        let engine = engine_with_accounts();
        engine.mint("admin1", amount(1000)).unwrap();
        engine.transfer("admin1", "student1", amount(100)).unwrap();

        let result = engine.transfer("student1", "admin1", amount(500));
        assert_eq!(
            result.unwrap_err(),
            LedgerError::insufficient_funds("student1", 100, 500)
        );

        assert_eq!(engine.balance("admin1").unwrap(), 900);
        assert_eq!(engine.balance("student1").unwrap(), 100);
        assert_eq!(engine.log().len(), 2);
    }

    #[test]
    fn test_self_transfer_rejected() {
        let engine = engine_with_accounts();
        engine.mint("admin1", amount(100)).unwrap();

        let result = engine.transfer("student1", "student1", amount(50));
        assert_eq!(result.unwrap_err(), LedgerError::self_transfer("student1"));
        assert_eq!(engine.log().len(), 1);
    }

    #[test]
    fn test_transfer_unknown_recipient_rejected() {
        let engine = engine_with_accounts();
        engine.mint("admin1", amount(100)).unwrap();

        let result = engine.transfer("admin1", "ghost", amount(10));
        assert_eq!(result.unwrap_err(), LedgerError::account_not_found("ghost"));
        assert_eq!(engine.balance("admin1").unwrap(), 100);
    }

    #[test]
    fn test_transfer_unknown_sender_rejected() {
        let engine = engine_with_accounts();
        let result = engine.transfer("ghost", "student1", amount(10));
        assert_eq!(result.unwrap_err(), LedgerError::account_not_found("ghost"));
    }

    #[test]
    fn test_round_trip_restores_balances_with_two_log_entries() {
        let engine = engine_with_accounts();
        engine.mint("admin1", amount(1000)).unwrap();

        let there = engine.transfer("admin1", "student1", amount(250)).unwrap();
        let back = engine.transfer("student1", "admin1", amount(250)).unwrap();

        assert_ne!(there.tx_id, back.tx_id);
        assert_eq!(engine.balance("admin1").unwrap(), 1000);
        assert_eq!(engine.balance("student1").unwrap(), 0);
        assert_eq!(engine.log().len(), 3);
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let engine = engine_with_accounts();
        let result = engine.register("student1", Role::Student);
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::AccountExists { .. }
        ));
    }

    #[test]
    fn test_register_system_sentinel_rejected() {
        let engine = LedgerEngine::new();
        let result = engine.register(SYSTEM_ACCOUNT, Role::Admin);
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::AccountExists { .. }
        ));
    }

    #[test]
    fn test_mint_overflow_rejected_without_partial_effect() {
        let engine = engine_with_accounts();
        engine.mint("admin1", amount(u64::MAX)).unwrap();

        let result = engine.mint("admin1", amount(1));
        assert!(matches!(result.unwrap_err(), LedgerError::Overflow { .. }));

        assert_eq!(engine.balance("admin1").unwrap(), u64::MAX);
        assert_eq!(engine.log().len(), 1);
    }

    #[test]
    fn test_distinct_commits_get_distinct_ids() {
        let engine = engine_with_accounts();
        // Same parties and amount in the same second; the nonce keeps ids unique
        let a = engine.mint("admin1", amount(10)).unwrap();
        let b = engine.mint("admin1", amount(10)).unwrap();
        assert_ne!(a.tx_id, b.tx_id);
    }

    #[test]
    fn test_balances_equal_signed_log_sums() {
        let engine = engine_with_accounts();
        engine.mint("admin1", amount(500)).unwrap();
        engine.transfer("admin1", "student1", amount(120)).unwrap();
        engine.transfer("student1", "merchant1", amount(20)).unwrap();
        engine.transfer("admin1", "merchant1", amount(30)).unwrap();

        for username in ["admin1", "student1", "merchant1"] {
            let mut expected: i128 = 0;
            for tx in engine.log().all() {
                if tx.to == username {
                    expected += tx.amount as i128;
                }
                if tx.from == username {
                    expected -= tx.amount as i128;
                }
            }
            assert_eq!(engine.balance(username).unwrap() as i128, expected);
        }
    }

    #[test]
    fn test_concurrent_transfers_never_go_negative() {
        use std::thread;

        let engine = Arc::new(engine_with_accounts());
        engine.mint("admin1", amount(100)).unwrap();

        // 50 threads each try to move 10 out of a balance of 100; exactly 10
        // can succeed, the rest must fail with InsufficientFunds.
        let mut handles = vec![];
        for _ in 0..50 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                engine
                    .transfer("admin1", "student1", Amount::new(10).unwrap())
                    .is_ok()
            }));
        }
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 10);
        assert_eq!(engine.balance("admin1").unwrap(), 0);
        assert_eq!(engine.balance("student1").unwrap(), 100);
        // One mint plus exactly the successful transfers made it to the log
        assert_eq!(engine.log().len(), 1 + successes as u64);
    }

    #[test]
    fn test_concurrent_transfer_storm_conserves_total() {
        use std::thread;

        let engine = Arc::new(engine_with_accounts());
        engine.mint("admin1", amount(10_000)).unwrap();

        let mut handles = vec![];
        for i in 0..40 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                let (from, to) = if i % 2 == 0 {
                    ("admin1", "student1")
                } else {
                    ("student1", "merchant1")
                };
                // Some of these are expected to fail with InsufficientFunds;
                // failures must leave no partial effect.
                let _ = engine.transfer(from, to, Amount::new(50).unwrap());
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let total = engine.balance("admin1").unwrap()
            + engine.balance("student1").unwrap()
            + engine.balance("merchant1").unwrap();
        assert_eq!(total, 10_000);

        // Log ordinals are dense and every logged transfer really happened
        let txs = engine.log().all();
        assert_eq!(engine.log().len(), txs.len() as u64);
    }
}
