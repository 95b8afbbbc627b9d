//! Transaction-related types for the VAP ledger
//!
//! This module defines the immutable transaction record appended to the log,
//! the validated `Amount` newtype used at the API boundary, and the
//! content-derived transaction identifier.

use crate::types::LedgerError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Transaction identifier: hex-encoded SHA-256 over the commit contents
pub type TxId = String;

/// Reserved sentinel used as the `from` field of mint transactions
///
/// `SYSTEM` is not a real account and can never be registered.
pub const SYSTEM_ACCOUNT: &str = "SYSTEM";

/// Kinds of committed transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    /// Creation of new currency, credited to an admin account
    ///
    /// Mint transactions carry the `SYSTEM` sentinel as their `from` field.
    Mint,

    /// Movement of currency between two existing accounts
    Transfer,
}

/// A committed, immutable ledger transaction
///
/// Once appended to the log a transaction is never edited, removed, or
/// reordered. The `timestamp` is assigned by the engine at commit time and is
/// never client-supplied. Serialized field names match the wire format the
/// dashboards consume (`txId`, `type`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Globally unique, content-derived identifier
    #[serde(rename = "txId")]
    pub tx_id: TxId,

    /// Sending account username, or [`SYSTEM_ACCOUNT`] for mints
    pub from: String,

    /// Receiving account username (the minting admin for mints)
    pub to: String,

    /// Strictly positive amount in whole VAP units
    pub amount: u64,

    /// Commit time, seconds since the Unix epoch
    pub timestamp: i64,

    /// Transaction kind
    #[serde(rename = "type")]
    pub kind: TxKind,
}

impl Transaction {
    /// Returns true if this transaction credits or debits `username`
    pub fn touches(&self, username: &str) -> bool {
        self.from == username || self.to == username
    }

    /// Derive a transaction identifier from the commit contents
    ///
    /// The id is the hex-encoded SHA-256 digest of
    /// `from|to|amount|timestamp|nonce`. The nonce is a per-engine counter,
    /// so two otherwise identical commits in the same second still get
    /// distinct ids; a collision therefore indicates either a construction
    /// bug or an adversarial replay and is rejected at append time rather
    /// than retried.
    pub fn derive_id(from: &str, to: &str, amount: u64, timestamp: i64, nonce: u64) -> TxId {
        let mut hasher = Sha256::new();
        hasher.update(from.as_bytes());
        hasher.update(b"|");
        hasher.update(to.as_bytes());
        hasher.update(b"|");
        hasher.update(amount.to_be_bytes());
        hasher.update(b"|");
        hasher.update(timestamp.to_be_bytes());
        hasher.update(b"|");
        hasher.update(nonce.to_be_bytes());
        hex::encode(hasher.finalize())
    }
}

/// A validated, strictly positive amount in whole VAP units
///
/// Constructed via [`Amount::new`] (rejects zero) or [`Amount::from_decimal`]
/// (additionally rejects fractional and negative caller input instead of
/// silently truncating). Engine mutation methods only accept this type, so an
/// invalid amount can never reach a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(u64);

impl Amount {
    /// Create an amount from whole units, rejecting zero
    pub fn new(units: u64) -> Result<Self, LedgerError> {
        if units == 0 {
            return Err(LedgerError::invalid_amount("0"));
        }
        Ok(Amount(units))
    }

    /// Create an amount from a caller-supplied decimal value
    ///
    /// Fractional, negative, zero, and out-of-range values are rejected with
    /// `InvalidAmount`. Amounts are whole units of VAP; there is no
    /// fractional denomination to truncate to.
    pub fn from_decimal(value: Decimal) -> Result<Self, LedgerError> {
        if !value.fract().is_zero() {
            return Err(LedgerError::invalid_amount(&value.to_string()));
        }
        let units = value
            .to_u64()
            .ok_or_else(|| LedgerError::invalid_amount(&value.to_string()))?;
        Self::new(units)
    }

    /// The amount in whole VAP units
    pub fn units(self) -> u64 {
        self.0
    }
}
