//! Temporal value decoding.
//!
//! A Date carries fixed-width decimal fields (4-digit year, 2-digit
//! month and day), an optional Time part (2-digit hour, minute and
//! second), an optional fraction introduced by the Point tag, and a
//! trailing zone marker. The fraction comes in digit triplets:
//! milliseconds, then optionally microseconds, then optionally
//! nanoseconds; everything is normalized into one nanosecond-resolution
//! field. A Time value is the same tail with the date fixed to the
//! epoch date.

use crate::error::{Error, Result};
use crate::source::ByteSource;
use crate::tag;

/// A decoded temporal value.
///
/// `utc` unterscheidet UTC von einer "floating" Zone ohne deklarierten
/// Offset; mehr Zonen-Information trägt das Wire-Format nicht.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Fraction of the second, normalized to nanoseconds.
    pub nanosecond: u32,
    /// True for the UTC zone marker, false for a floating zone.
    pub utc: bool,
}

/// Decodes the body of a Date value (the Date tag is already consumed).
///
/// Inspects the tag after the day field: a Time marker continues into
/// hour/minute/second and fraction parsing; any other tag is
/// reinterpreted as the zone marker with the time fields left at zero.
pub fn decode_date<S: ByteSource + ?Sized>(source: &mut S) -> Result<DateTime> {
    let year = read_fixed_digits(source, 4)? as u16;
    let month = read_fixed_digits(source, 2)? as u8;
    let day = read_fixed_digits(source, 2)? as u8;

    let next = source.read_byte()?;
    let (hour, minute, second, nanosecond, zone) = if next == tag::TIME {
        decode_time_tail(source)?
    } else {
        (0, 0, 0, 0, next)
    };

    Ok(DateTime {
        year,
        month,
        day,
        hour,
        minute,
        second,
        nanosecond,
        utc: zone == tag::UTC,
    })
}

/// Decodes the body of a Time value (the Time tag is already consumed).
///
/// The date fields are fixed to the epoch date 1970-01-01.
pub fn decode_time<S: ByteSource + ?Sized>(source: &mut S) -> Result<DateTime> {
    let (hour, minute, second, nanosecond, zone) = decode_time_tail(source)?;
    Ok(DateTime {
        year: 1970,
        month: 1,
        day: 1,
        hour,
        minute,
        second,
        nanosecond,
        utc: zone == tag::UTC,
    })
}

/// Liest Stunde/Minute/Sekunde, optionale Fraction und den Zonen-Tag.
///
/// Der zurückgegebene Zonen-Tag ist bereits konsumiert und wird nie
/// erneut gelesen.
fn decode_time_tail<S: ByteSource + ?Sized>(source: &mut S) -> Result<(u8, u8, u8, u32, u8)> {
    let hour = read_fixed_digits(source, 2)? as u8;
    let minute = read_fixed_digits(source, 2)? as u8;
    let second = read_fixed_digits(source, 2)? as u8;

    let next = source.read_byte()?;
    let (nanosecond, zone) = if next == tag::POINT {
        decode_fraction(source)?
    } else {
        (0, next)
    };
    Ok((hour, minute, second, nanosecond, zone))
}

/// Decodes the fraction triplets after a Point tag.
///
/// 3 Ziffern: Millisekunden (x1_000_000). Folgt unmittelbar ein
/// Ziffern-Tag, gehören diese Ziffer plus zwei weitere zur nächsten
/// Stufe (Mikrosekunden, x1_000), und noch einmal identisch für
/// Nanosekunden. Der erste Nicht-Ziffern-Tag danach ist der Zonen-Tag.
fn decode_fraction<S: ByteSource + ?Sized>(source: &mut S) -> Result<(u32, u8)> {
    let mut frac = read_fixed_digits(source, 3)?;
    let mut scale = 1_000_000u32;

    let mut next = source.read_byte()?;
    if tag::is_digit(next) {
        frac = frac * 1_000 + continue_triplet(source, next)?;
        scale = 1_000;
        next = source.read_byte()?;
        if tag::is_digit(next) {
            frac = frac * 1_000 + continue_triplet(source, next)?;
            scale = 1;
            next = source.read_byte()?;
        }
    }
    Ok((frac * scale, next))
}

/// Vervollständigt ein Triplet, dessen erste Ziffer schon gelesen wurde.
fn continue_triplet<S: ByteSource + ?Sized>(source: &mut S, first: u8) -> Result<u32> {
    Ok(tag::digit_value(first) as u32 * 100 + read_fixed_digits(source, 2)?)
}

/// Reads exactly `n` decimal digit bytes as one unsigned value.
fn read_fixed_digits<S: ByteSource + ?Sized>(source: &mut S, n: usize) -> Result<u32> {
    debug_assert!(n <= 9);
    let mut value = 0u32;
    for _ in 0..n {
        let byte = source.read_byte()?;
        if !byte.is_ascii_digit() {
            return Err(Error::invalid_number(&[byte]));
        }
        value = value * 10 + (byte - b'0') as u32;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;

    fn date_of(input: &[u8]) -> Result<DateTime> {
        decode_date(&mut SliceSource::new(input))
    }

    fn time_of(input: &[u8]) -> Result<DateTime> {
        decode_time(&mut SliceSource::new(input))
    }

    /// Date without a time part: the tag after the day is the zone.
    #[test]
    fn date_only_utc() {
        let dt = date_of(b"20260807Z").unwrap();
        assert_eq!((dt.year, dt.month, dt.day), (2026, 8, 7));
        assert_eq!((dt.hour, dt.minute, dt.second, dt.nanosecond), (0, 0, 0, 0));
        assert!(dt.utc);
    }

    /// A Semicolon zone marker selects the floating zone.
    #[test]
    fn date_only_floating() {
        let dt = date_of(b"20260807;").unwrap();
        assert!(!dt.utc);
    }

    /// Full date-time without fraction.
    #[test]
    fn date_with_time() {
        let dt = date_of(b"20260807T123456Z").unwrap();
        assert_eq!((dt.hour, dt.minute, dt.second), (12, 34, 56));
        assert_eq!(dt.nanosecond, 0);
        assert!(dt.utc);
    }

    /// A 3-digit fraction is milliseconds: x1_000_000 to nanoseconds.
    #[test]
    fn fraction_three_digits() {
        let dt = date_of(b"20260807T123456.123Z").unwrap();
        assert_eq!(dt.nanosecond, 123_000_000);
    }

    /// A 6-digit fraction is microseconds: x1_000 to nanoseconds.
    #[test]
    fn fraction_six_digits() {
        let dt = date_of(b"20260807T123456.123456Z").unwrap();
        assert_eq!(dt.nanosecond, 123_456_000);
    }

    /// A 9-digit fraction is nanoseconds, unscaled.
    #[test]
    fn fraction_nine_digits() {
        let dt = date_of(b"20260807T123456.123456789Z").unwrap();
        assert_eq!(dt.nanosecond, 123_456_789);
    }

    /// The zone tag after the fraction is consumed, not re-read.
    #[test]
    fn zone_tag_consumed_after_fraction() {
        let mut s = SliceSource::new(b"20260807T123456.123;X");
        let dt = decode_date(&mut s).unwrap();
        assert!(!dt.utc);
        assert_eq!(s.remaining(), b"X");
    }

    /// Time fixes the date fields to the epoch date.
    #[test]
    fn time_epoch_date() {
        let dt = time_of(b"235959;").unwrap();
        assert_eq!((dt.year, dt.month, dt.day), (1970, 1, 1));
        assert_eq!((dt.hour, dt.minute, dt.second), (23, 59, 59));
        assert!(!dt.utc);
    }

    /// Time with a nanosecond fraction and UTC zone.
    #[test]
    fn time_with_fraction() {
        let dt = time_of(b"120000.000000001Z").unwrap();
        assert_eq!(dt.nanosecond, 1);
        assert!(dt.utc);
    }

    /// Non-digit bytes inside a fixed-width field are rejected.
    #[test]
    fn garbage_in_fixed_field() {
        assert!(matches!(
            date_of(b"20x60807Z").unwrap_err(),
            Error::InvalidNumber(_)
        ));
    }

    /// End-of-stream inside the date fields is a truncated stream.
    #[test]
    fn truncated_date() {
        assert_eq!(date_of(b"2026").unwrap_err(), Error::TruncatedStream);
    }

    /// End-of-stream where the zone tag belongs is a truncated stream.
    #[test]
    fn truncated_before_zone() {
        assert_eq!(date_of(b"20260807").unwrap_err(), Error::TruncatedStream);
        assert_eq!(time_of(b"235959").unwrap_err(), Error::TruncatedStream);
    }
}
