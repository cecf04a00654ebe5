use filament_store::{BlobStore, StorageService, StoreResult};
use filament_types::{BlobKey, FileHandle};

use crate::error::{SessionError, SessionResult};

/// Client for scoped file sessions against a storage service.
///
/// Owns its service the way a repository owns its stores; wrap the service
/// in an `Arc` and clone it into several clients if it must be shared.
/// Session methods live in the write/read modules; lookup and deletion
/// delegations live here.
pub struct FileClient<S> {
    pub(crate) service: S,
}

impl<S> FileClient<S> {
    /// Create a client over `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// The underlying storage service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Consume the client, returning the service.
    pub fn into_inner(self) -> S {
        self.service
    }
}

impl<S: StorageService> FileClient<S> {
    /// The durable blob key for `file`.
    ///
    /// Fails with [`SessionError::Resolve`] if the file is unknown or was
    /// never finalized (no key exists yet).
    pub fn blob_key_of(&self, file: &FileHandle) -> SessionResult<BlobKey> {
        self.service.blob_key_of(file).map_err(SessionError::Resolve)
    }

    /// Inverse lookup: the file a blob key was assigned to.
    pub fn file_for(&self, key: &BlobKey) -> SessionResult<FileHandle> {
        self.service.file_for(key).map_err(SessionError::Resolve)
    }
}

impl<S: StorageService + BlobStore> FileClient<S> {
    /// Delete the file behind `file`.
    ///
    /// Resolves the handle to its blob key, then deletes by key. If
    /// resolution fails no deletion call is issued; if the blob store
    /// rejects the deletion (unknown key, already deleted) that failure
    /// propagates as [`SessionError::Delete`].
    pub fn delete(&self, file: &FileHandle) -> SessionResult<()> {
        let key = self.service.blob_key_of(file).map_err(SessionError::Resolve)?;
        self.service.delete_by_key(&key).map_err(SessionError::Delete)?;
        tracing::debug!(file = %file, key = %key, "file deleted");
        Ok(())
    }
}

impl<S> std::fmt::Debug for FileClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileClient").finish_non_exhaustive()
    }
}

/// Combine a session's primary outcome with its channel-release outcome.
///
/// The primary failure always survives: a release failure alone becomes
/// [`SessionError::Release`]; alongside a primary failure it is carried in
/// [`SessionError::ReleaseAfterFailure`] rather than masking it.
pub(crate) fn settle(
    primary: SessionResult<()>,
    release: StoreResult<()>,
) -> SessionResult<()> {
    match (primary, release) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(release)) => Err(SessionError::Release(release)),
        (Err(primary), Ok(())) => Err(primary),
        (Err(primary), Err(release)) => Err(SessionError::ReleaseAfterFailure {
            primary: Box::new(primary),
            release,
        }),
    }
}
