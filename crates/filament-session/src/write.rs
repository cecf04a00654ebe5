//! Write sessions: scoped acquisition of a write channel.
//!
//! A session opens exactly one channel, wraps it in the requested view,
//! runs the caller's action, and releases the channel on every path. The
//! action's failure is never swallowed by teardown; see
//! [`SessionError::ReleaseAfterFailure`] for the dual-failure case.

use std::io::{self, Write};

use filament_store::{StorageService, StoreError, WriteChannel};
use filament_types::FileHandle;

use crate::client::{settle, FileClient};
use crate::error::{ActionResult, SessionError, SessionResult};
use crate::options::WriteOptions;
use crate::text::TextWriter;

impl<S: StorageService> FileClient<S> {
    /// Run `action` with a text writer over a freshly opened write channel.
    ///
    /// The channel is closed exactly once before this returns: with
    /// `close_finally` when the resolved `finalize` is true (the default),
    /// making the file immutable and its blob key resolvable, otherwise
    /// with an ordinary `close`. Returns the original handle for chaining.
    pub fn with_writer<F>(
        &self,
        file: &FileHandle,
        options: WriteOptions,
        action: F,
    ) -> SessionResult<FileHandle>
    where
        F: FnOnce(&mut TextWriter<'_>) -> ActionResult<()>,
    {
        let opts = options.resolve();
        let mut channel = self
            .service
            .open_write_channel(file, opts.locked)
            .map_err(SessionError::Acquire)?;
        tracing::debug!(
            file = %file,
            locked = opts.locked,
            finalize = opts.finalize,
            encoding = opts.encoding.name(),
            "write session opened"
        );

        // Action first, then the view flush; the first failure is primary.
        let primary = {
            let mut writer = TextWriter::new(&mut channel, opts.encoding);
            let acted = action(&mut writer).map_err(SessionError::Action);
            let flushed = writer
                .finish()
                .map_err(|e| SessionError::Release(StoreError::Io(e)));
            acted.and(flushed)
        };

        let released = if opts.finalize {
            channel.close_finally()
        } else {
            channel.close()
        };
        settle(primary, released)?;
        Ok(file.clone())
    }

    /// Run `action` with a raw byte sink over a freshly opened write
    /// channel. Same lifecycle as [`with_writer`](Self::with_writer); the
    /// resolved encoding is ignored.
    pub fn with_output_stream<F>(
        &self,
        file: &FileHandle,
        options: WriteOptions,
        action: F,
    ) -> SessionResult<FileHandle>
    where
        F: FnOnce(&mut dyn io::Write) -> ActionResult<()>,
    {
        let opts = options.resolve();
        let mut channel = self
            .service
            .open_write_channel(file, opts.locked)
            .map_err(SessionError::Acquire)?;
        tracing::debug!(
            file = %file,
            locked = opts.locked,
            finalize = opts.finalize,
            "output stream session opened"
        );

        let primary = {
            let acted = action(&mut channel).map_err(SessionError::Action);
            let flushed = channel
                .flush()
                .map_err(|e| SessionError::Release(StoreError::Io(e)));
            acted.and(flushed)
        };

        let released = if opts.finalize {
            channel.close_finally()
        } else {
            channel.close()
        };
        settle(primary, released)?;
        Ok(file.clone())
    }
}
