//! Arbitrary-precision decimal bodies and special float values.
//!
//! A Double carries decimal text (digits, optional sign, optional
//! decimal point) terminated by Semicolon; the wire format imposes no
//! magnitude or precision bound, so bodies parse into
//! [`bigdecimal::BigDecimal`] rather than a machine float. NaN and the
//! two infinities are separate tags with no decimal body: NaN has no
//! payload at all, Infinity is followed by an optional Neg sign marker.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::error::{Error, Result};
use crate::source::ByteSource;
use crate::tag;

/// Decodes a decimal body terminated by Semicolon into a [`BigDecimal`].
///
/// An empty body decodes to 0 (wire shorthand `d;`).
pub fn decode_big_decimal<S: ByteSource + ?Sized>(source: &mut S) -> Result<BigDecimal> {
    let body = source.read_until(tag::SEMICOLON)?;
    parse_big_decimal(&body)
}

/// Reads the optional sign marker after an Infinity tag.
///
/// Returns `true` for negative infinity (Neg marker consumed), `false`
/// for positive (Pos marker consumed). The sign byte is part of the
/// Infinity encoding and always present on the wire.
pub fn decode_infinity_sign<S: ByteSource + ?Sized>(source: &mut S) -> Result<bool> {
    let sign = crate::source::expect_one_of(source, &[tag::NEG, tag::POS])?;
    Ok(sign == tag::NEG)
}

fn parse_big_decimal(body: &[u8]) -> Result<BigDecimal> {
    if body.is_empty() {
        return Ok(BigDecimal::from(0));
    }
    let text = std::str::from_utf8(body).map_err(|_| Error::invalid_number(body))?;
    BigDecimal::from_str(text).map_err(|_| Error::invalid_number(body))
}
