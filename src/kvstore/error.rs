use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by key-value store operations.
pub enum KvStoreError {
    /// Could not open a connection to the store.
    #[error("failed to connect to key-value store at '{url}' (db {db}): {message}")]
    ConnectionFailed {
        url: String,
        db: i64,
        message: String,
    },

    /// A command was sent but failed.
    #[error("key-value {operation} failed: {message}")]
    CommandFailed {
        operation: &'static str,
        message: String,
    },

    /// The store is reachable in principle but refusing work.
    #[error("key-value store unavailable: {message}")]
    Unavailable { message: String },
}
