//! Byte sources and tag-level stream primitives.
//!
//! The decoder issues many 1-4 byte reads per value, so a byte source
//! must support interleaved small reads. Two implementations are
//! provided: [`SliceSource`] over an in-memory buffer (with a `memchr`
//! fast path for terminator scans) and [`IoSource`] over any
//! [`std::io::Read`].

use std::io::Read;

use memchr::memchr;

use crate::error::{Error, Result};

/// A raw byte source consumed by the decoding engine.
///
/// End-of-stream inside a value is always [`Error::TruncatedStream`];
/// only [`ByteSource::try_read_byte`] reports a clean end (used by the
/// dispatcher to distinguish an empty stream from a truncated one).
pub trait ByteSource {
    /// Reads one byte, or `Ok(None)` on a clean end-of-stream.
    fn try_read_byte(&mut self) -> Result<Option<u8>>;

    /// Reads one byte; end-of-stream is [`Error::TruncatedStream`].
    fn read_byte(&mut self) -> Result<u8> {
        self.try_read_byte()?.ok_or(Error::TruncatedStream)
    }

    /// Fills `buf` completely; end-of-stream is [`Error::TruncatedStream`].
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        for slot in buf {
            *slot = self.read_byte()?;
        }
        Ok(())
    }

    /// Accumulates raw bytes until `terminator` is read. The terminator
    /// is consumed but excluded from the returned bytes. End-of-stream
    /// before the terminator is [`Error::TruncatedStream`].
    fn read_until(&mut self, terminator: u8) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let byte = self.read_byte()?;
            if byte == terminator {
                return Ok(out);
            }
            out.push(byte);
        }
    }
}

/// Byte source over an in-memory slice.
#[derive(Clone, Copy)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Creates a new source over the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The unread tail of the slice.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn try_read_byte(&mut self) -> Result<Option<u8>> {
        match self.data.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let end = self.pos + buf.len();
        if end > self.data.len() {
            return Err(Error::TruncatedStream);
        }
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(())
    }

    /// Terminator-Scan via memchr statt Byte-Schleife.
    fn read_until(&mut self, terminator: u8) -> Result<Vec<u8>> {
        let tail = &self.data[self.pos..];
        match memchr(terminator, tail) {
            Some(idx) => {
                self.pos += idx + 1;
                Ok(tail[..idx].to_vec())
            }
            None => {
                self.pos = self.data.len();
                Err(Error::TruncatedStream)
            }
        }
    }
}

/// Byte source adapter over any [`std::io::Read`].
///
/// Liest byteweise; Pufferung gehört in den Reader des Aufrufers
/// (z.B. `BufReader`), der Kern puffert nie mehr als den ungelesenen
/// Rest des aktuellen Werts.
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    /// Wraps a reader as a byte source.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn try_read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::IoError(e.to_string())),
            }
        }
    }
}

/// Reads one tag and fails with [`Error::TagMismatch`] unless it equals
/// `expected`.
pub fn expect_tag<S: ByteSource + ?Sized>(source: &mut S, expected: u8) -> Result<()> {
    let actual = source.read_byte()?;
    if actual == expected {
        Ok(())
    } else {
        Err(Error::tag_mismatch(describe_tag(expected), actual))
    }
}

/// Reads one tag, fails with [`Error::TagMismatch`] unless it is a member
/// of `candidates`, and returns the member that matched.
///
/// Der Rückgabewert treibt binäre/ternäre Verzweigungen (Wert oder Ref,
/// True oder False, Vorzeichen vorhanden oder nicht).
pub fn expect_one_of<S: ByteSource + ?Sized>(source: &mut S, candidates: &[u8]) -> Result<u8> {
    let actual = source.read_byte()?;
    if candidates.contains(&actual) {
        Ok(actual)
    } else {
        Err(Error::tag_mismatch(describe_tags(candidates), actual))
    }
}

fn describe_tag(tag: u8) -> String {
    if tag.is_ascii_graphic() {
        format!("'{}'", tag as char)
    } else {
        format!("0x{tag:02x}")
    }
}

fn describe_tags(tags: &[u8]) -> String {
    let parts: Vec<String> = tags.iter().map(|&t| describe_tag(t)).collect();
    format!("one of [{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Slice source yields bytes in order and reports a clean end.
    #[test]
    fn slice_read_bytes() {
        let mut s = SliceSource::new(b"ab");
        assert_eq!(s.try_read_byte().unwrap(), Some(b'a'));
        assert_eq!(s.read_byte().unwrap(), b'b');
        assert_eq!(s.try_read_byte().unwrap(), None);
        assert_eq!(s.read_byte().unwrap_err(), Error::TruncatedStream);
    }

    /// read_exact fills the whole buffer or fails without partial reads.
    #[test]
    fn slice_read_exact() {
        let mut s = SliceSource::new(b"abcd");
        let mut buf = [0u8; 3];
        s.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abc");
        let mut buf = [0u8; 2];
        assert_eq!(s.read_exact(&mut buf).unwrap_err(), Error::TruncatedStream);
    }

    /// read_until consumes the terminator but excludes it from the result.
    #[test]
    fn slice_read_until() {
        let mut s = SliceSource::new(b"123;rest");
        assert_eq!(s.read_until(b';').unwrap(), b"123");
        assert_eq!(s.remaining(), b"rest");
    }

    /// read_until with the terminator first yields an empty body.
    #[test]
    fn read_until_empty_body() {
        let mut s = SliceSource::new(b";x");
        assert_eq!(s.read_until(b';').unwrap(), b"");
        assert_eq!(s.read_byte().unwrap(), b'x');
    }

    /// Missing terminator is a truncated stream, not a partial result.
    #[test]
    fn read_until_truncated() {
        let mut s = SliceSource::new(b"123");
        assert_eq!(s.read_until(b';').unwrap_err(), Error::TruncatedStream);
    }

    /// Default (byte-loop) read_until matches the slice fast path.
    #[test]
    fn io_read_until_matches_slice() {
        let mut io = IoSource::new(&b"123;rest"[..]);
        assert_eq!(io.read_until(b';').unwrap(), b"123");
        let mut io = IoSource::new(&b"123"[..]);
        assert_eq!(io.read_until(b';').unwrap_err(), Error::TruncatedStream);
    }

    /// IoSource reports clean end-of-stream as None.
    #[test]
    fn io_clean_end() {
        let mut io = IoSource::new(&b""[..]);
        assert_eq!(io.try_read_byte().unwrap(), None);
    }

    /// expect_tag matches or reports both sides of the mismatch.
    #[test]
    fn expect_tag_match_and_mismatch() {
        let mut s = SliceSource::new(b";x");
        expect_tag(&mut s, b';').unwrap();
        let err = expect_tag(&mut s, b';').unwrap_err();
        match err {
            Error::TagMismatch { actual, .. } => assert_eq!(actual, b'x'),
            other => panic!("unexpected error {other:?}"),
        }
    }

    /// expect_one_of returns the matched member.
    #[test]
    fn expect_one_of_returns_match() {
        let mut s = SliceSource::new(b"tf");
        assert_eq!(expect_one_of(&mut s, &[b't', b'f']).unwrap(), b't');
        assert_eq!(expect_one_of(&mut s, &[b't', b'f']).unwrap(), b'f');
    }

    /// expect_one_of rejects a non-member with the candidate set named.
    #[test]
    fn expect_one_of_mismatch() {
        let mut s = SliceSource::new(b"x");
        let err = expect_one_of(&mut s, &[b't', b'f']).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'t'"), "{msg}");
        assert!(msg.contains("'f'"), "{msg}");
    }

    /// EOF while expecting a tag is a truncated stream.
    #[test]
    fn expect_tag_eof() {
        let mut s = SliceSource::new(b"");
        assert_eq!(expect_tag(&mut s, b';').unwrap_err(), Error::TruncatedStream);
    }
}
