//! Byte-blob decoding.
//!
//! A Bytes value carries a decimal length prefix (raw byte count, not
//! character count) terminated by Quote, exactly that many verbatim
//! bytes, and a trailing Quote.

use crate::error::Result;
use crate::source::{expect_tag, ByteSource};
use crate::tag;

/// Decodes a Bytes body into a raw byte vector.
pub fn decode_bytes<S: ByteSource + ?Sized>(source: &mut S) -> Result<Vec<u8>> {
    let len = crate::integer::decode_count(source, tag::QUOTE)?;
    // Kapazität gedeckelt: die Länge stammt aus dem Stream.
    let mut buf = Vec::with_capacity(len.min(16 * 1024 * 1024));
    for _ in 0..len {
        buf.push(source.read_byte()?);
    }
    expect_tag(source, tag::QUOTE)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::source::SliceSource;

    fn bytes_of(input: &[u8]) -> Result<Vec<u8>> {
        decode_bytes(&mut SliceSource::new(input))
    }

    /// Empty blob: length 0, no payload.
    #[test]
    fn empty_blob() {
        assert_eq!(bytes_of(b"0\"\"").unwrap(), Vec::<u8>::new());
    }

    /// Payload bytes pass through verbatim, including non-UTF-8.
    #[test]
    fn verbatim_payload() {
        assert_eq!(
            bytes_of(b"4\"\xDE\xAD\xBE\xEF\"").unwrap(),
            vec![0xDE, 0xAD, 0xBE, 0xEF]
        );
    }

    /// The length is a byte count: tag-like bytes in the payload are data.
    #[test]
    fn tag_bytes_in_payload() {
        assert_eq!(bytes_of(b"3\"a\"b\"").unwrap(), b"a\"b".to_vec());
    }

    /// Too few payload bytes is a truncated stream.
    #[test]
    fn truncated_payload() {
        assert_eq!(bytes_of(b"5\"ab").unwrap_err(), Error::TruncatedStream);
    }

    /// The byte after the payload must be the closing Quote.
    #[test]
    fn missing_closing_quote() {
        assert!(matches!(
            bytes_of(b"2\"abX").unwrap_err(),
            Error::TagMismatch { .. }
        ));
    }
}
