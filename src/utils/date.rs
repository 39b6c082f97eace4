//! UTC datetime utilities without timezone dependencies.
//!
//! Provides a lightweight `DateTimeUtc` struct for the two date shapes
//! pages carry in `<time datetime>`:
//!
//! - full timestamp: `YYYY-MM-DD HH:MM:SS`
//! - date only: `YYYY-MM-DD`
//!
//! Both shapes sort lexically in chronological order, which is what the
//! entry store relies on. Parsed values are reformatted for feeds:
//!
//! ```ignore
//! let dt = parse_feed_date("2024-12-03 22:28:00").unwrap();
//! assert_eq!(dt.to_rfc3339(), "2024-12-03T22:28:00Z");
//! assert_eq!(dt.to_rfc1123(), "Tue, 03 Dec 2024 22:28:00 UTC");
//! ```

use anyhow::{Result, bail};
use std::time::{SystemTime, UNIX_EPOCH};

const SECS_PER_DAY: u64 = 86_400;

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix(secs)
    }

    /// Convert seconds since the Unix epoch into a calendar datetime.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / SECS_PER_DAY) as i64;
        let rem = secs % SECS_PER_DAY;

        // Civil-from-days over 400-year eras, epoch shifted to 0000-03-01
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self::new(
            year as u16,
            month as u8,
            day as u8,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        )
    }

    #[allow(clippy::trivially_copy_pass_by_ref)] // Method style is more idiomatic
    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 {
            bail!("hour is invalid: {hour}");
        }
        if minute > 59 {
            bail!("minute is invalid: {minute}");
        }
        if second > 59 {
            bail!("second is invalid: {second}");
        }

        Ok(())
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Format as RFC 3339 (ISO 8601) for Atom feeds.
    ///
    /// Returns: `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// Format as RFC 1123 for RSS `pubDate`.
    ///
    /// Returns: `Tue, 03 Dec 2024 22:28:00 UTC`
    pub fn to_rfc1123(self) -> String {
        const WEEKDAYS: [&str; 7] = ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"];
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];

        format!(
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} UTC",
            WEEKDAYS[self.weekday_index()],
            self.day,
            MONTHS[(self.month - 1) as usize],
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }

    /// Zeller's congruence, 0 = Saturday.
    #[inline]
    #[allow(clippy::trivially_copy_pass_by_ref)]
    #[allow(clippy::cast_sign_loss)] // Result of % 7 is always 0-6
    fn weekday_index(&self) -> usize {
        let (y, m) = if self.month < 3 {
            (i32::from(self.year) - 1, i32::from(self.month) + 12)
        } else {
            (i32::from(self.year), i32::from(self.month))
        };
        let d = i32::from(self.day);
        ((d + (13 * (m + 1)) / 5 + y + y / 4 - y / 100 + y / 400) % 7) as usize
    }
}

/// Parse a full timestamp: `YYYY-MM-DD HH:MM:SS`.
pub fn parse_datetime(s: &str) -> Option<DateTimeUtc> {
    let bytes = s.as_bytes();
    if bytes.len() != 19 || bytes[10] != b' ' || bytes[13] != b':' || bytes[16] != b':' {
        return None;
    }

    let date = parse_date(&s[..10])?;
    let dt = DateTimeUtc::new(
        date.year,
        date.month,
        date.day,
        parse_u8(&bytes[11..13])?,
        parse_u8(&bytes[14..16])?,
        parse_u8(&bytes[17..19])?,
    );
    dt.validate().ok()?;
    Some(dt)
}

/// Parse a date without time: `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<DateTimeUtc> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let dt = DateTimeUtc::from_ymd(
        parse_u16(&bytes[0..4])?,
        parse_u8(&bytes[5..7])?,
        parse_u8(&bytes[8..10])?,
    );
    dt.validate().ok()?;
    Some(dt)
}

/// Parse an entry date, trying the full timestamp before the date-only form.
pub fn parse_feed_date(s: &str) -> Option<DateTimeUtc> {
    parse_datetime(s).or_else(|| parse_date(s))
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-12-03 22:28:00").unwrap();
        assert_eq!(dt, DateTimeUtc::new(2024, 12, 3, 22, 28, 0));
    }

    #[test]
    fn test_parse_datetime_rejects_other_shapes() {
        assert_eq!(parse_datetime("2024-12-03"), None);
        assert_eq!(parse_datetime("2024-12-03T22:28:00"), None);
        assert_eq!(parse_datetime("2024-12-03 22:28"), None);
        assert_eq!(parse_datetime("2024-12-03 24:00:00"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("1970-01-01"),
            Some(DateTimeUtc::from_ymd(1970, 1, 1))
        );
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_parse_feed_date_order() {
        assert_eq!(
            parse_feed_date("2024-06-15 14:30:45"),
            Some(DateTimeUtc::new(2024, 6, 15, 14, 30, 45))
        );
        assert_eq!(
            parse_feed_date("2024-06-15"),
            Some(DateTimeUtc::from_ymd(2024, 6, 15))
        );
        assert_eq!(parse_feed_date("June 15th"), None);
        assert_eq!(parse_feed_date(""), None);
    }

    #[test]
    fn test_to_rfc3339() {
        let dt = DateTimeUtc::new(2024, 12, 3, 22, 28, 0);
        assert_eq!(dt.to_rfc3339(), "2024-12-03T22:28:00Z");
        assert_eq!(
            DateTimeUtc::from_ymd(1970, 1, 1).to_rfc3339(),
            "1970-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_to_rfc1123() {
        let dt = DateTimeUtc::new(2024, 12, 3, 22, 28, 0);
        assert_eq!(dt.to_rfc1123(), "Tue, 03 Dec 2024 22:28:00 UTC");
        assert_eq!(
            DateTimeUtc::from_ymd(1970, 1, 1).to_rfc1123(),
            "Thu, 01 Jan 1970 00:00:00 UTC"
        );
    }

    #[test]
    fn test_from_unix() {
        assert_eq!(DateTimeUtc::from_unix(0), DateTimeUtc::from_ymd(1970, 1, 1));
        assert_eq!(
            DateTimeUtc::from_unix(1_733_264_880),
            DateTimeUtc::new(2024, 12, 3, 22, 28, 0)
        );
        // Leap day
        assert_eq!(
            DateTimeUtc::from_unix(951_782_400),
            DateTimeUtc::from_ymd(2000, 2, 29)
        );
    }

    #[test]
    fn test_now_is_valid() {
        assert!(DateTimeUtc::now().validate().is_ok());
    }

    #[test]
    fn test_datetime_utc_validate_invalid_day() {
        // Day 31 in a 30-day month
        assert!(DateTimeUtc::new(2024, 4, 31, 12, 0, 0).validate().is_err());

        // Day 29 in February (non-leap year)
        assert!(DateTimeUtc::new(2023, 2, 29, 12, 0, 0).validate().is_err());
    }

    #[test]
    fn test_datetime_utc_validate_leap_year() {
        assert!(DateTimeUtc::new(2024, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTimeUtc::new(2000, 2, 29, 12, 0, 0).validate().is_ok()); // divisible by 400
        assert!(DateTimeUtc::new(1900, 2, 29, 12, 0, 0).validate().is_err()); // divisible by 100 but not 400
    }

    #[test]
    fn test_datetime_utc_all_months() {
        let months = [
            (1, "Jan"),
            (2, "Feb"),
            (3, "Mar"),
            (4, "Apr"),
            (5, "May"),
            (6, "Jun"),
            (7, "Jul"),
            (8, "Aug"),
            (9, "Sep"),
            (10, "Oct"),
            (11, "Nov"),
            (12, "Dec"),
        ];

        for (month_num, month_name) in months {
            let dt = DateTimeUtc::new(2024, month_num, 15, 12, 0, 0);
            assert!(dt.validate().is_ok());
            let rfc1123 = dt.to_rfc1123();
            assert!(
                rfc1123.contains(month_name),
                "Month {} should contain {}",
                month_num,
                month_name
            );
        }
    }
}
