//! Read sessions: scoped acquisition of a read channel.
//!
//! Reading never changes terminal state, so there is no finalize path
//! here; release is always an ordinary close. The guaranteed-release
//! discipline is otherwise identical to the write sessions.

use std::io::{self, BufReader};

use filament_store::{ReadChannel, StorageService};
use filament_types::FileHandle;

use crate::client::{settle, FileClient};
use crate::error::{ActionResult, SessionError, SessionResult};
use crate::options::ReadOptions;
use crate::text::TextReader;

impl<S: StorageService> FileClient<S> {
    /// Run `action` with a text reader over a freshly opened read channel.
    ///
    /// The channel is closed exactly once before this returns, whether the
    /// action completes or fails. Returns the original handle for chaining.
    pub fn with_reader<F>(
        &self,
        file: &FileHandle,
        options: ReadOptions,
        action: F,
    ) -> SessionResult<FileHandle>
    where
        F: FnOnce(&mut TextReader<'_>) -> ActionResult<()>,
    {
        let opts = options.resolve();
        let mut channel = self
            .service
            .open_read_channel(file, opts.locked)
            .map_err(SessionError::Acquire)?;
        tracing::debug!(
            file = %file,
            locked = opts.locked,
            encoding = opts.encoding.name(),
            "read session opened"
        );

        let primary = {
            let mut reader = TextReader::new(&mut channel, opts.encoding);
            action(&mut reader).map_err(SessionError::Action)
        };

        let released = channel.close();
        settle(primary, released)?;
        Ok(file.clone())
    }

    /// Run `action` with a buffered byte source over a freshly opened read
    /// channel. Same lifecycle as [`with_reader`](Self::with_reader); the
    /// resolved encoding is ignored.
    pub fn with_input_stream<F>(
        &self,
        file: &FileHandle,
        options: ReadOptions,
        action: F,
    ) -> SessionResult<FileHandle>
    where
        F: FnOnce(&mut dyn io::BufRead) -> ActionResult<()>,
    {
        let opts = options.resolve();
        let mut channel = self
            .service
            .open_read_channel(file, opts.locked)
            .map_err(SessionError::Acquire)?;
        tracing::debug!(file = %file, locked = opts.locked, "input stream session opened");

        let primary = {
            let mut buffered = BufReader::new(&mut channel);
            action(&mut buffered).map_err(SessionError::Action)
        };

        let released = channel.close();
        settle(primary, released)?;
        Ok(file.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use filament_store::{InMemoryStorage, StoreError};

    use super::*;
    use crate::options::WriteOptions;

    fn client_with_file(path: &str, text: &str) -> (FileClient<InMemoryStorage>, FileHandle) {
        let client = FileClient::new(InMemoryStorage::new());
        let file = FileHandle::from_path(path);
        client
            .with_writer(&file, WriteOptions::new(), |w| {
                w.write_str(text)?;
                Ok(())
            })
            .unwrap();
        (client, file)
    }

    // -----------------------------------------------------------------------
    // Round trips
    // -----------------------------------------------------------------------

    #[test]
    fn utf8_round_trip() {
        let (client, file) = client_with_file("/files/hello", "hello");
        let mut seen = String::new();
        let returned = client
            .with_reader(&file, ReadOptions::new(), |r| {
                seen = r.read_to_string()?;
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, "hello");
        assert_eq!(returned, file);
    }

    #[test]
    fn windows_1252_round_trip() {
        let client = FileClient::new(InMemoryStorage::new());
        let file = FileHandle::from_path("/files/latin");
        client
            .with_writer(
                &file,
                WriteOptions::new().encoding(encoding_rs::WINDOWS_1252),
                |w| {
                    w.write_str("déjà vu")?;
                    Ok(())
                },
            )
            .unwrap();

        let mut seen = String::new();
        client
            .with_reader(
                &file,
                ReadOptions::new().encoding(encoding_rs::WINDOWS_1252),
                |r| {
                    seen = r.read_to_string()?;
                    Ok(())
                },
            )
            .unwrap();
        assert_eq!(seen, "déjà vu");
    }

    #[test]
    fn input_stream_reads_raw_bytes() {
        let client = FileClient::new(InMemoryStorage::new());
        let file = FileHandle::from_path("/files/raw");
        client
            .with_output_stream(&file, WriteOptions::new(), |out| {
                out.write_all(&[1, 2, 3])?;
                Ok(())
            })
            .unwrap();

        let mut seen = Vec::new();
        client
            .with_input_stream(&file, ReadOptions::new(), |input| {
                input.read_to_end(&mut seen)?;
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, [1, 2, 3]);
    }

    #[test]
    fn sessions_chain_through_the_returned_handle() {
        let client = FileClient::new(InMemoryStorage::new());
        let file = FileHandle::from_path("/files/chained");

        let mut seen = String::new();
        let file = client
            .with_writer(&file, WriteOptions::new(), |w| {
                w.write_str("linked")?;
                Ok(())
            })
            .and_then(|file| {
                client.with_reader(&file, ReadOptions::new(), |r| {
                    seen = r.read_to_string()?;
                    Ok(())
                })
            })
            .unwrap();

        assert_eq!(seen, "linked");
        assert_eq!(file.path(), "/files/chained");
    }

    // -----------------------------------------------------------------------
    // Failure propagation and release
    // -----------------------------------------------------------------------

    #[test]
    fn reading_unfinalized_file_is_an_acquisition_failure() {
        let client = FileClient::new(InMemoryStorage::new());
        let file = FileHandle::from_path("/files/wip");
        client
            .with_writer(&file, WriteOptions::new().finalize(false), |w| {
                w.write_str("draft")?;
                Ok(())
            })
            .unwrap();

        let err = client
            .with_reader(&file, ReadOptions::new(), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Acquire(StoreError::NotFinalized(_))
        ));
    }

    #[test]
    fn action_failure_still_releases_the_lock() {
        let (client, file) = client_with_file("/files/fail", "data");

        let err = client
            .with_reader(&file, ReadOptions::new(), |_| Err("reader broke".into()))
            .unwrap_err();
        assert!(matches!(err, SessionError::Action(_)));

        // The locked channel was closed: a new locked session succeeds.
        client
            .with_reader(&file, ReadOptions::new(), |_| Ok(()))
            .unwrap();
    }

    #[test]
    fn concurrent_locked_readers_fail_fast() {
        let (client, file) = client_with_file("/files/contended", "data");

        client
            .with_reader(&file, ReadOptions::new(), |_| {
                // Session holds the lock while the action runs.
                let err = client
                    .with_reader(&file, ReadOptions::new(), |_| Ok(()))
                    .unwrap_err();
                assert!(matches!(
                    err,
                    SessionError::Acquire(StoreError::AlreadyLocked(_))
                ));
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn unlocked_readers_coexist() {
        let (client, file) = client_with_file("/files/shared", "data");

        client
            .with_reader(&file, ReadOptions::new().locked(false), |_| {
                client
                    .with_reader(&file, ReadOptions::new().locked(false), |_| Ok(()))
                    .map(|_| ())
                    .map_err(|e| -> crate::ActionError { Box::new(e) })
            })
            .unwrap();
    }
}
