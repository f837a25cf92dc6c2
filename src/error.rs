// src/error.rs
use thiserror::Error;

/// Errors surfaced by the notification feed core.
///
/// Every failure a caller can observe maps onto exactly one of these
/// variants; nothing is caught and discarded inside the core.
#[derive(Error, Debug)]
pub enum FeedError {
    /// A stored kind string has no entry in the taxonomy. This is a
    /// data-integrity signal and is raised at classification time rather
    /// than silently dropping the row.
    #[error("unrecognized notification kind: {0}")]
    UnrecognizedKind(String),

    /// Malformed input, rejected before any store access.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No authenticated identity in the request context, rejected before
    /// any store access.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The read-state transition targeted a row that does not exist.
    #[error("notification {0} not found")]
    NotificationNotFound(i64),

    /// The underlying store failed. Propagated unchanged; retry policy
    /// belongs to the caller, not this core.
    #[error("store error: {0}")]
    Store(String),
}
