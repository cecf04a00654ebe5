use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to a remotely stored file.
///
/// A `FileHandle` names a file independently of whether it exists or has
/// been finalized. Handles are normally allocated by the storage service,
/// but [`FileHandle::from_path`] builds one purely from a path string with
/// no I/O and no validation -- the referenced file may not exist yet.
///
/// Handles are immutable and cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileHandle(String);

impl FileHandle {
    /// Build a handle from a path string. Pure construction: no I/O, no
    /// check against any storage service.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The full path this handle refers to.
    pub fn path(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileHandle({})", self.0)
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileHandle {
    fn from(path: &str) -> Self {
        Self::from_path(path)
    }
}

impl From<String> for FileHandle {
    fn from(path: String) -> Self {
        Self::from_path(path)
    }
}
