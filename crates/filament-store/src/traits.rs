use std::io;

use filament_types::{BlobKey, FileHandle};

use crate::error::StoreResult;

/// A live write conduit to a file's bytes.
///
/// A channel is exclusively owned by whoever opened it and must be closed
/// exactly once, through [`close`](WriteChannel::close) or
/// [`close_finally`](WriteChannel::close_finally). Closing a channel twice
/// is a `ChannelClosed` error. Backends may treat data written before the
/// close as uncommitted; only a successful close makes it observable.
pub trait WriteChannel: io::Write + std::fmt::Debug {
    /// Release the channel. The file stays writable by later channels.
    fn close(&mut self) -> StoreResult<()>;

    /// Terminal finalize-close: persist, mark the file immutable, and make
    /// its blob key resolvable. No write channel can be opened against the
    /// file afterwards.
    fn close_finally(&mut self) -> StoreResult<()>;
}

/// A live read conduit to a file's bytes.
pub trait ReadChannel: io::Read + std::fmt::Debug {
    /// Release the channel.
    fn close(&mut self) -> StoreResult<()>;
}

/// Remote file storage service.
///
/// All implementations must satisfy these invariants:
/// - Exactly one channel owns a file's exclusive lock at a time. A second
///   open against a locked file fails fast with `AlreadyLocked` rather
///   than blocking.
/// - Finalization is terminal: once a file is finalized, write opens fail
///   with `Finalized` and the file's blob key resolves.
/// - Blob keys are opaque and 1:1 with finalized files.
/// - All failures are propagated, never retried or downgraded.
pub trait StorageService: Send + Sync {
    /// Open a write channel against `file`, taking the exclusive lock when
    /// `locked` is true. Creates the file if the backend allocates lazily.
    fn open_write_channel(
        &self,
        file: &FileHandle,
        locked: bool,
    ) -> StoreResult<Box<dyn WriteChannel + '_>>;

    /// Open a read channel against `file`, taking the exclusive lock when
    /// `locked` is true.
    fn open_read_channel(
        &self,
        file: &FileHandle,
        locked: bool,
    ) -> StoreResult<Box<dyn ReadChannel + '_>>;

    /// The durable blob key for `file`.
    ///
    /// Fails if the file is unknown or has never been finalized (no key
    /// exists until finalization).
    fn blob_key_of(&self, file: &FileHandle) -> StoreResult<BlobKey>;

    /// Inverse lookup: the file a blob key was assigned to.
    ///
    /// Fails with `UnknownBlobKey` if the key was never assigned.
    fn file_for(&self, key: &BlobKey) -> StoreResult<FileHandle>;
}

/// Blob removal by durable key.
///
/// Kept separate from [`StorageService`]: deletion is a blob-store concern
/// and some deployments route it to a different collaborator.
pub trait BlobStore: Send + Sync {
    /// Delete the blob behind `key`. Fails with `UnknownBlobKey` if the
    /// store does not know the key (never assigned, or already deleted).
    fn delete_by_key(&self, key: &BlobKey) -> StoreResult<()>;
}
