//! Bookmark-based pagination over the transaction log
//!
//! This module provides the `Paginator`, which exposes the log as pages of
//! oldest-first records with an opaque continuation bookmark. Callers pass an
//! empty bookmark to start and receive an empty bookmark at end-of-data.
//!
//! # Bookmark opacity
//!
//! The bookmark is a versioned, base64-encoded token (`v1:<ordinal>` today).
//! Callers must treat it as uninterpretable; the encoding can change without
//! breaking them. Because it resolves to an ordinal range scan, a bookmark
//! captured at time T never repeats and never skips records that existed at
//! T, even while new transactions are appended: appends only land past the
//! end of any range already handed out.

use crate::core::TransactionLog;
use crate::types::{LedgerError, Transaction};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;

/// Page size used when the caller passes zero
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Current bookmark encoding version
const BOOKMARK_VERSION: &str = "v1";

/// One page of transaction history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Matching transactions, oldest first
    pub records: Vec<Transaction>,
    /// Continuation token; empty string signals end of data
    pub bookmark: String,
}

/// Stable paginated iteration over the transaction log
#[derive(Debug, Clone)]
pub struct Paginator {
    log: Arc<TransactionLog>,
}

impl Paginator {
    /// Create a paginator over a shared transaction log
    pub fn new(log: Arc<TransactionLog>) -> Self {
        Self { log }
    }

    /// Fetch one page of the filtered sequence
    ///
    /// `filter` restricts to transactions touching the given username
    /// (sender or recipient); `None` yields the global explorer view. An
    /// empty `bookmark` starts from the beginning. `page_size` of zero falls
    /// back to [`DEFAULT_PAGE_SIZE`]. A page shorter than `page_size` with a
    /// non-empty bookmark never occurs; a short page always means the
    /// returned bookmark is empty and the sequence is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBookmark` if the bookmark was not issued by this
    /// ledger, or `Conflict` if a consistent read view could not be obtained.
    pub fn page(
        &self,
        filter: Option<&str>,
        bookmark: &str,
        page_size: usize,
    ) -> Result<Page, LedgerError> {
        let from = decode_bookmark(bookmark)?;
        let limit = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };

        let scan = self.log.scan(filter, from, limit)?;
        let bookmark = match scan.resume_from {
            Some(ordinal) => encode_bookmark(ordinal),
            None => String::new(),
        };
        Ok(Page {
            records: scan.records,
            bookmark,
        })
    }
}

/// Encode a resume ordinal as an opaque bookmark token
fn encode_bookmark(ordinal: u64) -> String {
    general_purpose::STANDARD.encode(format!("{BOOKMARK_VERSION}:{ordinal}"))
}

/// Decode a bookmark token back to a resume ordinal
///
/// The empty string decodes to the start of the sequence.
fn decode_bookmark(token: &str) -> Result<u64, LedgerError> {
    if token.is_empty() {
        return Ok(0);
    }
    let bytes = general_purpose::STANDARD
        .decode(token)
        .map_err(|_| LedgerError::invalid_bookmark(token))?;
    let decoded = String::from_utf8(bytes).map_err(|_| LedgerError::invalid_bookmark(token))?;
    let ordinal = decoded
        .strip_prefix(BOOKMARK_VERSION)
        .and_then(|rest| rest.strip_prefix(':'))
        .and_then(|rest| rest.parse::<u64>().ok())
        .ok_or_else(|| LedgerError::invalid_bookmark(token))?;
    Ok(ordinal)
}
