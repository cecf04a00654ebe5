//! Encoded text views over raw channels.
//!
//! A view is constructed by a session over the channel it owns, handed to
//! the caller's action, and torn down by the session before the channel is
//! released. Views never outlive their channel.

use std::io::{self, Read, Write};

use encoding_rs::{CoderResult, Encoder, Encoding};

/// Text writer over a write channel.
///
/// Encodes `&str` input through the session's resolved encoding. UTF-8
/// input to a UTF-8 channel is written directly; other encodings stream
/// through an incremental encoder whose tail is flushed at session
/// teardown. Unmappable characters follow encoding_rs replacement
/// semantics (numeric character references).
pub struct TextWriter<'a> {
    inner: &'a mut dyn Write,
    encoding: &'static Encoding,
    encoder: Encoder,
}

impl<'a> TextWriter<'a> {
    pub(crate) fn new(inner: &'a mut dyn Write, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            encoder: encoding.new_encoder(),
        }
    }

    /// Encode `s` and write it to the channel.
    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        if self.encoding == encoding_rs::UTF_8 {
            return self.inner.write_all(s.as_bytes());
        }
        let mut buf = [0u8; 1024];
        let mut rest = s;
        loop {
            let (result, read, written, _) = self.encoder.encode_from_utf8(rest, &mut buf, false);
            self.inner.write_all(&buf[..written])?;
            rest = &rest[read..];
            match result {
                CoderResult::InputEmpty => return Ok(()),
                CoderResult::OutputFull => continue,
            }
        }
    }

    /// Encode a single character.
    pub fn write_char(&mut self, c: char) -> io::Result<()> {
        let mut tmp = [0u8; 4];
        self.write_str(c.encode_utf8(&mut tmp))
    }

    /// Flush the encoder tail and the underlying channel. Consumes the
    /// view; called by the session at teardown on every path.
    pub(crate) fn finish(mut self) -> io::Result<()> {
        let mut buf = [0u8; 64];
        loop {
            let (result, _, written, _) = self.encoder.encode_from_utf8("", &mut buf, true);
            self.inner.write_all(&buf[..written])?;
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
        self.inner.flush()
    }
}

/// Text reader over a read channel.
///
/// Buffers the remaining channel bytes and decodes them with the session's
/// resolved encoding. Decoding is strict: malformed input is an
/// `InvalidData` error, not silent replacement.
pub struct TextReader<'a> {
    inner: &'a mut dyn Read,
    encoding: &'static Encoding,
}

impl<'a> TextReader<'a> {
    pub(crate) fn new(inner: &'a mut dyn Read, encoding: &'static Encoding) -> Self {
        Self { inner, encoding }
    }

    /// Read the rest of the channel and decode it to a `String`.
    ///
    /// A byte-order mark matching the encoding family is honored per
    /// [`Encoding::decode`].
    pub fn read_to_string(&mut self) -> io::Result<String> {
        let mut bytes = Vec::new();
        self.inner.read_to_end(&mut bytes)?;
        let (text, _, had_errors) = self.encoding.decode(&bytes);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed {} input", self.encoding.name()),
            ));
        }
        Ok(text.into_owned())
    }
}
