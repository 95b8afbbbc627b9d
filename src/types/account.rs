//! Account-related types for the VAP ledger
//!
//! This module defines the Account structure and the role assigned to each
//! account at registration time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role assigned to an account at registration
///
/// The role is set when the account is created and is never changed by the
/// ledger core. Only the `Admin` role may mint new currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Campus administration; the only role permitted to mint
    Admin,

    /// Campus merchant accepting VAP payments
    Merchant,

    /// Student wallet holder
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Merchant => write!(f, "merchant"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// Ledger account state
///
/// Represents the current state of a wallet: its immutable username, the role
/// set at registration, and the current balance in whole VAP units.
///
/// The balance is a derived aggregate of the transaction log: at all times it
/// equals the sum of signed amounts touching this account across the log
/// (mint credits `to`; transfer debits `from` and credits `to`). It is only
/// mutated from within an engine-coordinated commit and never goes negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier, immutable once created
    pub username: String,

    /// Role set at creation; not changed by the ledger core
    pub role: Role,

    /// Current balance in whole VAP units
    pub balance: u64,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Account {
            username: username.into(),
            role,
            balance: 0,
        }
    }
}
