//! In-memory storage backend for testing and embedding.
//!
//! [`InMemoryStorage`] keeps every file in a `HashMap` behind a `RwLock`
//! and implements both [`StorageService`] and [`BlobStore`]. Channel data
//! is buffered per channel and committed to the file entry only on a
//! successful close; a channel dropped without closing releases its lock
//! and persists nothing.

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::sync::RwLock;

use filament_types::{BlobKey, FileHandle};

use crate::error::{StoreError, StoreResult};
use crate::traits::{BlobStore, ReadChannel, StorageService, WriteChannel};

#[derive(Default)]
struct Entry {
    data: Vec<u8>,
    finalized: bool,
    locked: bool,
    blob_key: Option<BlobKey>,
}

#[derive(Default)]
struct Inner {
    files: HashMap<FileHandle, Entry>,
    by_key: HashMap<BlobKey, FileHandle>,
}

/// In-memory, HashMap-based storage service and blob store.
///
/// Intended for tests and embedding. Write channels append to the file on
/// close, matching services that treat unfinalized files as append-only.
/// Read channels see a snapshot taken at open time. Blob keys are assigned
/// at finalization from the handle's path bytes; callers must treat them
/// as opaque.
pub struct InMemoryStorage {
    inner: RwLock<Inner>,
}

impl InMemoryStorage {
    /// Create a new empty storage service.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of files currently known.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").files.len()
    }

    /// Returns `true` if no files are known.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").files.is_empty()
    }

    /// Returns `true` if `file` has an entry (written to at least once).
    pub fn contains(&self, file: &FileHandle) -> bool {
        self.inner
            .read()
            .expect("lock poisoned")
            .files
            .contains_key(file)
    }

    fn release_lock(&self, file: &FileHandle) {
        if let Ok(mut inner) = self.inner.write() {
            if let Some(entry) = inner.files.get_mut(file) {
                entry.locked = false;
            }
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageService for InMemoryStorage {
    fn open_write_channel(
        &self,
        file: &FileHandle,
        locked: bool,
    ) -> StoreResult<Box<dyn WriteChannel + '_>> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let entry = inner.files.entry(file.clone()).or_default();
        if entry.finalized {
            return Err(StoreError::Finalized(file.clone()));
        }
        if entry.locked {
            return Err(StoreError::AlreadyLocked(file.clone()));
        }
        if locked {
            entry.locked = true;
        }
        tracing::debug!(file = %file, locked, "write channel opened");
        Ok(Box::new(InMemoryWriteChannel {
            store: self,
            file: file.clone(),
            locked,
            buf: Vec::new(),
            open: true,
        }))
    }

    fn open_read_channel(
        &self,
        file: &FileHandle,
        locked: bool,
    ) -> StoreResult<Box<dyn ReadChannel + '_>> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let entry = inner
            .files
            .get_mut(file)
            .ok_or_else(|| StoreError::NotFound(file.clone()))?;
        if !entry.finalized {
            return Err(StoreError::NotFinalized(file.clone()));
        }
        if entry.locked {
            return Err(StoreError::AlreadyLocked(file.clone()));
        }
        if locked {
            entry.locked = true;
        }
        let snapshot = entry.data.clone();
        tracing::debug!(file = %file, locked, bytes = snapshot.len(), "read channel opened");
        Ok(Box::new(InMemoryReadChannel {
            store: self,
            file: file.clone(),
            locked,
            cursor: Cursor::new(snapshot),
            open: true,
        }))
    }

    fn blob_key_of(&self, file: &FileHandle) -> StoreResult<BlobKey> {
        let inner = self.inner.read().expect("lock poisoned");
        let entry = inner
            .files
            .get(file)
            .ok_or_else(|| StoreError::NotFound(file.clone()))?;
        entry
            .blob_key
            .ok_or_else(|| StoreError::NotFinalized(file.clone()))
    }

    fn file_for(&self, key: &BlobKey) -> StoreResult<FileHandle> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .by_key
            .get(key)
            .cloned()
            .ok_or(StoreError::UnknownBlobKey(*key))
    }
}

impl BlobStore for InMemoryStorage {
    fn delete_by_key(&self, key: &BlobKey) -> StoreResult<()> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let file = inner
            .by_key
            .remove(key)
            .ok_or(StoreError::UnknownBlobKey(*key))?;
        inner.files.remove(&file);
        tracing::debug!(file = %file, key = %key, "blob deleted");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStorage")
            .field("file_count", &self.len())
            .finish()
    }
}

/// Write channel over an [`InMemoryStorage`] file.
///
/// Bytes are buffered locally and appended to the file entry on close.
#[derive(Debug)]
struct InMemoryWriteChannel<'a> {
    store: &'a InMemoryStorage,
    file: FileHandle,
    locked: bool,
    buf: Vec<u8>,
    open: bool,
}

impl InMemoryWriteChannel<'_> {
    fn settle(&mut self, finalize: bool) -> StoreResult<()> {
        if !self.open {
            return Err(StoreError::ChannelClosed);
        }
        self.open = false;
        let mut inner = self.store.inner.write().expect("lock poisoned");
        let Inner { files, by_key } = &mut *inner;
        let entry = files
            .get_mut(&self.file)
            .ok_or_else(|| StoreError::NotFound(self.file.clone()))?;
        entry.data.append(&mut self.buf);
        if self.locked {
            entry.locked = false;
        }
        if finalize {
            entry.finalized = true;
            let key = BlobKey::from_bytes(*blake3::hash(self.file.path().as_bytes()).as_bytes());
            entry.blob_key = Some(key);
            by_key.insert(key, self.file.clone());
            tracing::debug!(file = %self.file, key = %key, "file finalized");
        }
        Ok(())
    }
}

impl io::Write for InMemoryWriteChannel<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if !self.open {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "channel already closed",
            ));
        }
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Data reaches the entry only through close/close_finally.
        Ok(())
    }
}

impl WriteChannel for InMemoryWriteChannel<'_> {
    fn close(&mut self) -> StoreResult<()> {
        self.settle(false)
    }

    fn close_finally(&mut self) -> StoreResult<()> {
        self.settle(true)
    }
}

impl Drop for InMemoryWriteChannel<'_> {
    fn drop(&mut self) {
        // Unclosed channel: release the lock, discard the buffer.
        if self.open && self.locked {
            self.store.release_lock(&self.file);
        }
    }
}

/// Read channel over a snapshot of an [`InMemoryStorage`] file.
#[derive(Debug)]
struct InMemoryReadChannel<'a> {
    store: &'a InMemoryStorage,
    file: FileHandle,
    locked: bool,
    cursor: Cursor<Vec<u8>>,
    open: bool,
}

impl io::Read for InMemoryReadChannel<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.open {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "channel already closed",
            ));
        }
        self.cursor.read(buf)
    }
}

impl ReadChannel for InMemoryReadChannel<'_> {
    fn close(&mut self) -> StoreResult<()> {
        if !self.open {
            return Err(StoreError::ChannelClosed);
        }
        self.open = false;
        if self.locked {
            self.store.release_lock(&self.file);
        }
        Ok(())
    }
}

impl Drop for InMemoryReadChannel<'_> {
    fn drop(&mut self) {
        if self.open && self.locked {
            self.store.release_lock(&self.file);
        }
    }
}
