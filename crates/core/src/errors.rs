use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the entire watchlist-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage ─────────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Invalid watchlist name: {0}")]
    InvalidName(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cannot delete the last remaining watchlist")]
    CannotDeleteLastWatchlist,

    #[error("Unknown watchlist: {0}")]
    UnknownWatchlist(Uuid),

    #[error("Item index {index} out of range for watchlist with {len} items")]
    ItemIndexOutOfRange { index: usize, len: usize },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
