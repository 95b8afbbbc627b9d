//! Read-side services: bookmark pagination and public verification.

pub mod pagination;
pub mod verify;

pub use pagination::{Page, Paginator, DEFAULT_PAGE_SIZE};
pub use verify::VerificationService;
