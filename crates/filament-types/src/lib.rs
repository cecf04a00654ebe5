//! Foundation types for Filament.
//!
//! This crate provides the identifier types shared by every other Filament
//! crate. It has no I/O and no knowledge of any storage backend.
//!
//! # Key Types
//!
//! - [`FileHandle`] -- Opaque reference to a remotely stored file, valid
//!   whether or not the file has been finalized (or even created)
//! - [`BlobKey`] -- Durable key assigned to a file once it is finalized;
//!   used for cross-referencing and deletion

pub mod error;
pub mod handle;
pub mod key;

pub use error::TypeError;
pub use handle::FileHandle;
pub use key::BlobKey;
