//! Session option resolution.
//!
//! Options are sparse: every field is optional and unset fields resolve to
//! a documented default, once, at session entry. Resolution is pure.
//!
//! Defaults: `encoding = UTF-8`, `locked = true`, and (writes only)
//! `finalize = true`. Callers that want an unlocked or resumable write
//! opt out explicitly.

use encoding_rs::Encoding;

/// Options for a write session.
///
/// `encoding` only applies to [`with_writer`](crate::FileClient::with_writer);
/// byte-stream sessions ignore it.
#[derive(Clone, Copy, Debug, Default)]
pub struct WriteOptions {
    encoding: Option<&'static Encoding>,
    locked: Option<bool>,
    finalize: Option<bool>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text encoding for the writer view. Default: UTF-8.
    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Take the file's exclusive lock for the session. Default: true.
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    /// Finalize-close the channel at session end, making the file
    /// immutable and its blob key resolvable. Default: true.
    pub fn finalize(mut self, finalize: bool) -> Self {
        self.finalize = Some(finalize);
        self
    }

    pub(crate) fn resolve(self) -> ResolvedWrite {
        ResolvedWrite {
            encoding: self.encoding.unwrap_or(encoding_rs::UTF_8),
            locked: self.locked.unwrap_or(true),
            finalize: self.finalize.unwrap_or(true),
        }
    }
}

/// Options for a read session. Reading never changes terminal state, so
/// there is no `finalize` here.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadOptions {
    encoding: Option<&'static Encoding>,
    locked: Option<bool>,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text encoding for the reader view. Default: UTF-8.
    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Take the file's exclusive lock for the session. Default: true.
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub(crate) fn resolve(self) -> ResolvedRead {
        ResolvedRead {
            encoding: self.encoding.unwrap_or(encoding_rs::UTF_8),
            locked: self.locked.unwrap_or(true),
        }
    }
}

/// Fully-resolved write policy. Immutable after resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ResolvedWrite {
    pub encoding: &'static Encoding,
    pub locked: bool,
    pub finalize: bool,
}

/// Fully-resolved read policy. Immutable after resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ResolvedRead {
    pub encoding: &'static Encoding,
    pub locked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_defaults() {
        let resolved = WriteOptions::new().resolve();
        assert_eq!(resolved.encoding, encoding_rs::UTF_8);
        assert!(resolved.locked);
        assert!(resolved.finalize);
    }

    #[test]
    fn read_defaults() {
        let resolved = ReadOptions::new().resolve();
        assert_eq!(resolved.encoding, encoding_rs::UTF_8);
        assert!(resolved.locked);
    }

    #[test]
    fn set_fields_win_over_defaults() {
        let resolved = WriteOptions::new()
            .encoding(encoding_rs::WINDOWS_1252)
            .locked(false)
            .finalize(false)
            .resolve();
        assert_eq!(resolved.encoding, encoding_rs::WINDOWS_1252);
        assert!(!resolved.locked);
        assert!(!resolved.finalize);
    }

    #[test]
    fn partial_overrides_keep_remaining_defaults() {
        let resolved = WriteOptions::new().finalize(false).resolve();
        assert_eq!(resolved.encoding, encoding_rs::UTF_8);
        assert!(resolved.locked);
        assert!(!resolved.finalize);
    }

    #[test]
    fn resolution_is_repeatable() {
        let options = ReadOptions::new().locked(false);
        assert_eq!(options.resolve(), options.resolve());
    }
}
