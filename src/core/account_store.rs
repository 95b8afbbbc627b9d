//! Thread-safe account storage
//!
//! This module provides the `AccountStore`, the leaf data structure holding
//! current balance and role per username.
//!
//! # Design
//!
//! Accounts live in a `DashMap`, so reads of different accounts never block
//! each other and a single account's entry is locked only for the instant a
//! balance is read or written. Balance mutations (`credit`/`debit`) are
//! crate-internal: they are only ever called from within an engine-coordinated
//! commit, never exposed to callers outside the core.

use crate::types::{Account, LedgerError, Role, SYSTEM_ACCOUNT};
use dashmap::DashMap;

/// Thread-safe map of username to account state
///
/// # Thread Safety
///
/// All methods are safe to call from multiple threads concurrently. Reads
/// return a clone of the entry, a snapshot at the time of the call. Atomicity
/// across multiple accounts (the transfer critical section) is the engine's
/// responsibility, not the store's.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: DashMap<String, Account>,
}

impl AccountStore {
    /// Create a new empty AccountStore
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Create a new account with a zero balance
    ///
    /// # Errors
    ///
    /// Returns `AccountExists` if the username is already registered, or if
    /// it is the reserved `SYSTEM` sentinel.
    pub fn create(&self, username: &str, role: Role) -> Result<Account, LedgerError> {
        if username == SYSTEM_ACCOUNT {
            return Err(LedgerError::account_exists(username));
        }
        use dashmap::mapref::entry::Entry;
        match self.accounts.entry(username.to_string()) {
            Entry::Occupied(_) => Err(LedgerError::account_exists(username)),
            Entry::Vacant(vacant) => {
                let account = Account::new(username, role);
                vacant.insert(account.clone());
                Ok(account)
            }
        }
    }

    /// Look up an account by username
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub fn get(&self, username: &str) -> Result<Account, LedgerError> {
        self.accounts
            .get(username)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LedgerError::account_not_found(username))
    }

    /// Current balance of an account in whole VAP units
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub fn balance(&self, username: &str) -> Result<u64, LedgerError> {
        self.get(username).map(|account| account.balance)
    }

    /// Whether an account with this username exists
    pub fn contains(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }

    /// Number of accounts in the store
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All accounts sorted by username
    ///
    /// Sorted output keeps listings and snapshots deterministic.
    pub fn all_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        accounts
    }

    /// Credit an account's balance
    ///
    /// Only called from within an engine-coordinated commit.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist, or `Overflow`
    /// if the new balance would exceed `u64::MAX`.
    pub(crate) fn credit(&self, username: &str, amount: u64) -> Result<(), LedgerError> {
        let mut entry = self
            .accounts
            .get_mut(username)
            .ok_or_else(|| LedgerError::account_not_found(username))?;
        let account = entry.value_mut();
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("credit", username))?;
        Ok(())
    }

    /// Debit an account's balance
    ///
    /// Only called from within an engine-coordinated commit.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist, or
    /// `InsufficientFunds` if the resulting balance would go negative.
    pub(crate) fn debit(&self, username: &str, amount: u64) -> Result<(), LedgerError> {
        let mut entry = self
            .accounts
            .get_mut(username)
            .ok_or_else(|| LedgerError::account_not_found(username))?;
        let account = entry.value_mut();
        account.balance = account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::insufficient_funds(username, account.balance, amount))?;
        Ok(())
    }

    /// Replace the entire store contents
    ///
    /// Used by restore after snapshot validation has passed; callers hold the
    /// commit lock so no mutation can interleave with the swap.
    pub(crate) fn replace_all(&self, accounts: Vec<Account>) {
        self.accounts.clear();
        for account in accounts {
            self.accounts.insert(account.username.clone(), account);
        }
    }
}
