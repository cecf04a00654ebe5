use filament_types::{BlobKey, FileHandle};

/// Errors from storage service and blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The referenced file does not exist in the service.
    #[error("file not found: {0}")]
    NotFound(FileHandle),

    /// The file has not been finalized, so the requested operation
    /// (reading, blob-key lookup) is not available yet.
    #[error("file not finalized: {0}")]
    NotFinalized(FileHandle),

    /// The file is finalized and can no longer be opened for writing.
    #[error("file already finalized: {0}")]
    Finalized(FileHandle),

    /// Another live channel holds the exclusive lock on this file.
    /// Lock contention fails fast; it never blocks.
    #[error("file is locked by another channel: {0}")]
    AlreadyLocked(FileHandle),

    /// The blob key is not known to the store (never assigned, or the
    /// blob was already deleted).
    #[error("unknown blob key: {0}")]
    UnknownBlobKey(BlobKey),

    /// The channel was already closed.
    #[error("channel already closed")]
    ChannelClosed,

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
