//! Hprose 2.0 wire marker bytes.
//!
//! Every serialized value starts with a one-byte tag that identifies its
//! type; a handful of structural tags delimit lengths, counts, fractions
//! and time zones. The alphabet is fixed by the published Hprose 2.0
//! serialization format and must match bit-for-bit for interoperability.
//!
//! The ASCII digits `'0'..='9'` double as direct integer literals with no
//! terminator ("digit shortcut").

// Value tags
pub const INTEGER: u8 = b'i';
pub const LONG: u8 = b'l';
pub const DOUBLE: u8 = b'd';
pub const NAN: u8 = b'N';
pub const INFINITY: u8 = b'I';
pub const NULL: u8 = b'n';
pub const EMPTY: u8 = b'e';
pub const TRUE: u8 = b't';
pub const FALSE: u8 = b'f';
pub const DATE: u8 = b'D';
pub const TIME: u8 = b'T';
pub const BYTES: u8 = b'b';
pub const UTF8CHAR: u8 = b'u';
pub const STRING: u8 = b's';
pub const GUID: u8 = b'g';
pub const LIST: u8 = b'a';
pub const MAP: u8 = b'm';
pub const CLASS: u8 = b'c';
pub const OBJECT: u8 = b'o';
pub const REF: u8 = b'r';
pub const ERROR: u8 = b'E';

// Structural tags
/// Terminates variable-width numeric bodies (Integer, Long, Double, Ref).
pub const SEMICOLON: u8 = b';';
/// Terminates length prefixes and payloads of String/Bytes values.
pub const QUOTE: u8 = b'"';
/// Opens a count-delimited body (List, Map, Object, Class) and a Guid token.
pub const OPENBRACE: u8 = b'{';
/// Closes a count-delimited body and a Guid token.
pub const CLOSEBRACE: u8 = b'}';
/// Starts the fractional-seconds part of a Date/Time value.
pub const POINT: u8 = b'.';
/// Sign marker for negative numbers and negative infinity.
pub const NEG: u8 = b'-';
/// Sign marker for explicitly positive numbers.
pub const POS: u8 = b'+';
/// Time zone marker: the preceding temporal value is UTC.
pub const UTC: u8 = b'Z';

/// True if `tag` is one of the digit literals `'0'..='9'`.
#[inline]
pub fn is_digit(tag: u8) -> bool {
    tag.is_ascii_digit()
}

/// The integer literal 0..=9 encoded by a digit tag.
///
/// # Panics
///
/// Panics (debug) if `tag` is not a digit tag.
#[inline]
pub fn digit_value(tag: u8) -> u8 {
    debug_assert!(is_digit(tag), "digit_value: tag {tag:#04x} is not a digit");
    tag - b'0'
}
