//! Variable-width decimal integer bodies.
//!
//! Integer, Long and Ref values carry their magnitude as ASCII decimal
//! digits (optional leading sign) terminated by the Semicolon tag;
//! container counts use the same digit syntax with a different
//! terminator. The digit shortcut for literals 0-9 is handled by the
//! dispatcher, not here.

use num_bigint::BigInt;

use crate::error::{Error, Result};
use crate::source::ByteSource;
use crate::tag;

/// Decodes a signed decimal body terminated by Semicolon into an `i64`.
///
/// An empty body decodes to 0 (wire shorthand `i;`). Magnitudes outside
/// the i64 range are [`Error::IntegerOverflow`]; unbounded magnitudes
/// belong to the Long decoder.
pub fn decode_i64<S: ByteSource + ?Sized>(source: &mut S) -> Result<i64> {
    let body = source.read_until(tag::SEMICOLON)?;
    parse_i64(&body)
}

/// Decodes a signed decimal body terminated by Semicolon into a
/// [`BigInt`] (arbitrary precision, no magnitude bound).
pub fn decode_big<S: ByteSource + ?Sized>(source: &mut S) -> Result<BigInt> {
    let body = source.read_until(tag::SEMICOLON)?;
    parse_big(&body)
}

/// Decodes an unsigned decimal count terminated by `terminator`.
///
/// Counts prefix container bodies (List, Map, Object, Class) and text
/// lengths; an empty digit run counts as zero (`a{}` is the empty list).
pub fn decode_count<S: ByteSource + ?Sized>(source: &mut S, terminator: u8) -> Result<usize> {
    let body = source.read_until(terminator)?;
    let mut value: usize = 0;
    for &byte in &body {
        let digit = match byte {
            b'0'..=b'9' => (byte - b'0') as usize,
            _ => return Err(Error::invalid_number(&body)),
        };
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or(Error::IntegerOverflow)?;
    }
    Ok(value)
}

/// Trennt ein optionales Vorzeichen vom Ziffern-Rest ab.
fn split_sign(body: &[u8]) -> (bool, &[u8]) {
    match body.first() {
        Some(&tag::NEG) => (true, &body[1..]),
        Some(&tag::POS) => (false, &body[1..]),
        _ => (false, body),
    }
}

/// Parst Dezimalziffern als i64 mit Überlauf-Erkennung.
///
/// Akkumuliert im negativen Wertebereich, der i64::MIN darstellen kann;
/// das Negieren am Ende erkennt den positiven Überlauf.
fn parse_i64(body: &[u8]) -> Result<i64> {
    let (negative, digits) = split_sign(body);
    let mut value: i64 = 0;
    for &byte in digits {
        let digit = match byte {
            b'0'..=b'9' => (byte - b'0') as i64,
            _ => return Err(Error::invalid_number(body)),
        };
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_sub(digit))
            .ok_or(Error::IntegerOverflow)?;
    }
    if negative {
        Ok(value)
    } else {
        value.checked_neg().ok_or(Error::IntegerOverflow)
    }
}

/// Parst Dezimalziffern als BigInt.
fn parse_big(body: &[u8]) -> Result<BigInt> {
    let (negative, digits) = split_sign(body);
    if digits.is_empty() {
        return Ok(BigInt::from(0));
    }
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(Error::invalid_number(body));
    }
    let magnitude =
        BigInt::parse_bytes(digits, 10).ok_or_else(|| Error::invalid_number(body))?;
    Ok(if negative { -magnitude } else { magnitude })
}
