//! String, single-character and GUID token decoding.
//!
//! A String's decimal length prefix counts **UTF-16 code units**, not
//! bytes and not Unicode scalar values, while the payload itself is
//! UTF-8. The decoder therefore scans raw bytes, derives each sequence
//! width from the lead byte's high bits, and counts a 4-byte sequence
//! (one surrogate pair in UTF-16) as two units. Reproducing this rule
//! exactly is required for wire compatibility.

use crate::error::{Error, Result};
use crate::source::{expect_tag, ByteSource};
use crate::tag;

/// Decodes `units` UTF-16 code units' worth of UTF-8 bytes.
///
/// Ein 4-Byte-Lead als letzte verbleibende Einheit wird vollständig
/// konsumiert und akzeptiert; der Zähler überschießt dann um eins
/// (Verhalten der Referenz-Implementierung).
pub fn decode_utf8_units<S: ByteSource + ?Sized>(source: &mut S, units: usize) -> Result<String> {
    // Payload-Bytes: mindestens `units`, höchstens 3x (BMP) bzw. 2x pro
    // Einheit bei Surrogate-Paaren.
    let mut buf = Vec::with_capacity(units.min(16 * 1024 * 1024));
    let mut remaining = units;
    while remaining > 0 {
        let lead = source.read_byte()?;
        buf.push(lead);
        let (extra, cost) = match lead {
            0x00..=0x7F => (0usize, 1usize),
            0xC0..=0xDF => (1, 1),
            0xE0..=0xEF => (2, 1),
            0xF0..=0xF7 => (3, 2),
            _ => return Err(Error::InvalidUtf8Sequence(lead)),
        };
        for _ in 0..extra {
            buf.push(source.read_byte()?);
        }
        remaining = remaining.saturating_sub(cost);
    }
    match String::from_utf8(buf) {
        Ok(s) => Ok(s),
        Err(e) => {
            let pos = e.utf8_error().valid_up_to();
            Err(Error::InvalidUtf8Sequence(e.as_bytes()[pos]))
        }
    }
}

/// Decodes a String body: decimal UTF-16-unit length terminated by
/// Quote, the payload, and the trailing Quote (consumed, excluded).
///
/// Used for String values and, untracked, for class and field names.
pub fn decode_string_body<S: ByteSource + ?Sized>(source: &mut S) -> Result<String> {
    let units = crate::integer::decode_count(source, tag::QUOTE)?;
    let value = decode_utf8_units(source, units)?;
    expect_tag(source, tag::QUOTE)?;
    Ok(value)
}

/// Decodes exactly one UTF-8 encoded character (the UTF8Char payload).
pub fn decode_char<S: ByteSource + ?Sized>(source: &mut S) -> Result<char> {
    let s = decode_utf8_units(source, 1)?;
    // decode_utf8_units(1) liefert genau eine Sequenz.
    let mut chars = s.chars();
    let ch = chars.next().ok_or(Error::TruncatedStream)?;
    debug_assert!(chars.next().is_none());
    Ok(ch)
}

/// Decodes a GUID token: an Openbrace byte, 36 verbatim characters and a
/// Closebrace byte, stored as an opaque string with no grammar
/// validation.
pub fn decode_guid<S: ByteSource + ?Sized>(source: &mut S) -> Result<String> {
    expect_tag(source, tag::OPENBRACE)?;
    let mut buf = [0u8; 36];
    source.read_exact(&mut buf)?;
    expect_tag(source, tag::CLOSEBRACE)?;
    match std::str::from_utf8(&buf) {
        Ok(s) => Ok(s.to_string()),
        Err(e) => Err(Error::InvalidUtf8Sequence(buf[e.valid_up_to()])),
    }
}
