//! Scoped channel sessions for Filament.
//!
//! This crate is the client-side core: it opens a read or write channel
//! against a pluggable [`StorageService`](filament_store::StorageService),
//! wraps it in an encoded view, hands the view to caller-supplied logic,
//! and guarantees the channel is released -- or permanently finalized --
//! on every exit path, including failure of the caller's logic.
//!
//! # Sessions
//!
//! All four session operations on [`FileClient`] follow the same shape:
//! resolve options, acquire exactly one channel, run the action, release.
//! Write sessions finalize-close by default, which makes the file
//! immutable and its blob key resolvable; pass
//! [`WriteOptions::finalize`]`(false)` to keep the file writable.
//!
//! ```
//! use filament_session::{FileClient, ReadOptions, WriteOptions};
//! use filament_store::InMemoryStorage;
//! use filament_types::FileHandle;
//!
//! # fn main() -> Result<(), filament_session::SessionError> {
//! let client = FileClient::new(InMemoryStorage::new());
//! let file = FileHandle::from_path("/files/greeting");
//!
//! client.with_writer(&file, WriteOptions::new(), |w| {
//!     w.write_str("hello")?;
//!     Ok(())
//! })?;
//!
//! let mut text = String::new();
//! client.with_reader(&file, ReadOptions::new(), |r| {
//!     text = r.read_to_string()?;
//!     Ok(())
//! })?;
//! assert_eq!(text, "hello");
//!
//! let key = client.blob_key_of(&file)?;
//! client.delete(&client.file_for(&key)?)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Failure policy
//!
//! Failures surface to the immediate caller; nothing is retried or
//! downgraded. A release failure never masks an action failure: when both
//! occur the session returns
//! [`SessionError::ReleaseAfterFailure`] carrying the action failure as
//! the primary cause.

pub mod client;
pub mod error;
pub mod options;
pub mod read;
pub mod text;
pub mod write;

// Re-export primary types at crate root for ergonomic imports.
pub use client::FileClient;
pub use error::{ActionError, ActionResult, SessionError, SessionResult};
pub use options::{ReadOptions, WriteOptions};
pub use text::{TextReader, TextWriter};

// The identifier types travel with the session API.
pub use filament_types::{BlobKey, FileHandle};
