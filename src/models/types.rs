//! Column conversions between domain values and their stored form.
//!
//! Fixed-point numbers are stored as integers scaled by 10^4. Timestamps are
//! stored as RFC 3339 text in UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits kept by [`Fixed4`]
pub const SCALE: u32 = 4;

const MULTIPLIER: i64 = 10_i64.pow(SCALE);

/// Fixed-point decimal with four fractional digits, held as scaled units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed4(i64);

impl Fixed4 {
    /// Wrap a stored integer (already scaled).
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// The stored integer representation.
    pub const fn units(self) -> i64 {
        self.0
    }

    /// Integer part, truncated toward zero.
    pub const fn trunc(self) -> i64 {
        self.0 / MULTIPLIER
    }

    /// Fractional part in units of 10^-4, carrying the sign of the value.
    pub const fn fract_units(self) -> i64 {
        self.0 % MULTIPLIER
    }
}

impl From<i32> for Fixed4 {
    fn from(value: i32) -> Self {
        Self(i64::from(value) * MULTIPLIER)
    }
}

impl fmt::Display for Fixed4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = self.trunc().unsigned_abs();
        let fract = self.fract_units().unsigned_abs();
        if fract == 0 {
            return write!(f, "{}{}", sign, whole);
        }
        let digits = format!("{:0width$}", fract, width = SCALE as usize);
        write!(f, "{}{}.{}", sign, whole, digits.trim_end_matches('0'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFixedError(String);

impl fmt::Display for ParseFixedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid fixed-point value: {}", self.0)
    }
}

impl std::error::Error for ParseFixedError {}

impl FromStr for Fixed4 {
    type Err = ParseFixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseFixedError(s.to_string());
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fract) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fract.is_empty() {
            return Err(invalid());
        }
        if fract.len() > SCALE as usize
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fract.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fract: i64 = if fract.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", fract, width = SCALE as usize);
            padded.parse().map_err(|_| invalid())?
        };

        let units = whole
            .checked_mul(MULTIPLIER)
            .and_then(|w| w.checked_add(fract))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -units } else { units }))
    }
}

/// Encode a whole number for a fixed-point column.
pub fn encode_int(value: i32) -> i64 {
    Fixed4::from(value).units()
}

/// Decode a fixed-point column back to a whole number, saturating at the
/// bounds of `i32`.
pub fn decode_int(units: i64) -> i32 {
    let whole = Fixed4::from_units(units).trunc();
    i32::try_from(whole).unwrap_or(if whole < 0 { i32::MIN } else { i32::MAX })
}

/// Normalize an offset-aware timestamp to UTC.
fn normalize<Tz: TimeZone>(value: DateTime<Tz>) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

pub fn timestamp_to_storage(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

/// Parse a stored timestamp. Values without an offset are taken as UTC.
pub fn timestamp_from_storage(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(normalize(parsed));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .or_else(|| {
            tracing::warn!("Unreadable stored timestamp: {:?}", raw);
            None
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    #[test]
    fn fixed_point_round_trips_through_storage() {
        let value: Fixed4 = "12.3456".parse().unwrap();
        assert_eq!(value.units(), 123_456);

        let reloaded = Fixed4::from_units(value.units());
        assert_eq!(reloaded, value);
        assert_eq!(reloaded.to_string(), "12.3456");
    }

    #[test]
    fn fixed_point_parses_short_and_signed_values() {
        assert_eq!("7".parse::<Fixed4>().unwrap().units(), 70_000);
        assert_eq!("0.5".parse::<Fixed4>().unwrap().units(), 5_000);
        assert_eq!("-0.5".parse::<Fixed4>().unwrap().units(), -5_000);
        assert_eq!(".25".parse::<Fixed4>().unwrap().to_string(), "0.25");
        assert_eq!(Fixed4::from_units(-123_456).to_string(), "-12.3456");
    }

    #[test]
    fn fixed_point_rejects_extra_precision_and_garbage() {
        assert!("1.23456".parse::<Fixed4>().is_err());
        assert!("abc".parse::<Fixed4>().is_err());
        assert!("".parse::<Fixed4>().is_err());
        assert!("1.2.3".parse::<Fixed4>().is_err());
    }

    #[test]
    fn whole_numbers_survive_encoding() {
        assert_eq!(encode_int(1965), 19_650_000);
        assert_eq!(decode_int(encode_int(1965)), 1965);
        assert_eq!(decode_int(encode_int(-44)), -44);
        assert_eq!(decode_int(i64::MAX), i32::MAX);
    }

    #[test]
    fn aware_timestamps_normalize_to_utc() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let utc = normalize(local);
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn stored_timestamps_round_trip() {
        let now = Utc::now();
        let stored = timestamp_to_storage(&now);
        assert_eq!(timestamp_from_storage(&stored), Some(now));

        let naive = timestamp_from_storage("2024-03-01 09:15:00").unwrap();
        assert_eq!(naive, Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap());

        let shifted = timestamp_from_storage("2024-03-01T09:15:00+01:00").unwrap();
        assert_eq!(shifted + Duration::hours(1), naive);
        assert_eq!(timestamp_from_storage("yesterday"), None);
    }
}
