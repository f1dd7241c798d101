use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, UtcOffset};

use crate::ValidationError;

const DAY_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

const NANOS_PER_MILLI: i128 = 1_000_000;

// Wider than the whole representable calendar; keeps `Duration::days` from overflowing.
const MAX_DAY_SPAN: i64 = 8_000_000;

/// Calendar date without a time component, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(Date);

impl CalendarDay {
    pub const MIN: Self = Self(Date::MIN);
    pub const MAX: Self = Self(Date::MAX);

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), DAY_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: format!("{year:04}-{month:02}-{day:02}"),
        };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    /// Calendar date of an epoch-millisecond instant observed at `offset`.
    pub fn from_unix_millis(millis: i64, offset: UtcOffset) -> Result<Self, ValidationError> {
        let shifted = i128::from(millis) + i128::from(offset.whole_seconds()) * 1_000;
        OffsetDateTime::from_unix_timestamp_nanos(shifted * NANOS_PER_MILLI)
            .map(|instant| Self(instant.date()))
            .map_err(|_| ValidationError::TimestampOutOfRange { millis })
    }

    /// Epoch milliseconds of this day's UTC midnight.
    pub fn unix_millis_at_midnight(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp() * 1_000
    }

    /// The following day, saturating at [`CalendarDay::MAX`].
    pub fn next_day(self) -> Self {
        self.checked_next_day().unwrap_or(self)
    }

    /// The following day, or `None` on [`CalendarDay::MAX`].
    pub fn checked_next_day(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// Shift by a signed number of days, saturating at the calendar limits.
    pub fn offset_days(self, days: i64) -> Self {
        match self
            .0
            .checked_add(Duration::days(days.clamp(-MAX_DAY_SPAN, MAX_DAY_SPAN)))
        {
            Some(date) => Self(date),
            None if days < 0 => Self::MIN,
            None => Self::MAX,
        }
    }

    /// Signed number of days from `self` to `later`.
    pub fn days_until(self, later: Self) -> i64 {
        (later.0 - self.0).whole_days()
    }
}

impl Display for CalendarDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = self.0.format(DAY_FORMAT).map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl FromStr for CalendarDay {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl From<Date> for CalendarDay {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Serialize for CalendarDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, offset};

    use super::*;

    #[test]
    fn parses_and_formats_iso_day() {
        let day = CalendarDay::parse("2011-06-09").expect("must parse");
        assert_eq!(day.into_inner(), date!(2011 - 06 - 09));
        assert_eq!(day.to_string(), "2011-06-09");
    }

    #[test]
    fn rejects_malformed_day() {
        for input in ["2011-13-01", "2011-02-30", "09/06/2011", "", "2011-06-09T00:00:00Z"] {
            let err = CalendarDay::parse(input).expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidDate { .. }), "{input}");
        }
    }

    #[test]
    fn from_ymd_validates_components() {
        assert_eq!(
            CalendarDay::from_ymd(2012, 2, 29).expect("leap day"),
            CalendarDay::parse("2012-02-29").expect("leap day")
        );
        let err = CalendarDay::from_ymd(2013, 2, 29).expect_err("not a leap year");
        assert_eq!(
            err,
            ValidationError::InvalidDate {
                value: "2013-02-29".to_owned()
            }
        );
    }

    #[test]
    fn next_day_rolls_over_month_and_year() {
        let day = CalendarDay::parse("2011-12-31").expect("day");
        assert_eq!(day.next_day().to_string(), "2012-01-01");
        assert_eq!(CalendarDay::MAX.next_day(), CalendarDay::MAX);
        assert_eq!(CalendarDay::MAX.checked_next_day(), None);
        assert_eq!(day.checked_next_day(), Some(day.next_day()));
    }

    #[test]
    fn display_pads_years_through_the_day_format() {
        let early = CalendarDay::from_ymd(999, 3, 7).expect("day");
        assert_eq!(early.to_string(), "0999-03-07");
        assert_eq!(CalendarDay::MAX.to_string(), "9999-12-31");
        assert_eq!(CalendarDay::MIN.to_string(), "-9999-01-01");
    }

    #[test]
    fn offset_days_saturates_at_calendar_limits() {
        let day = CalendarDay::parse("2011-06-09").expect("day");
        assert_eq!(day.offset_days(-60).to_string(), "2011-04-10");
        assert_eq!(day.offset_days(60).to_string(), "2011-08-08");
        assert_eq!(CalendarDay::MIN.offset_days(-1), CalendarDay::MIN);
        assert_eq!(day.offset_days(i64::MAX / 2), CalendarDay::MAX);
    }

    #[test]
    fn converts_unix_millis_under_offset() {
        // 2013-04-09T23:30:00Z
        let millis = 1_365_550_200_000;
        let utc = CalendarDay::from_unix_millis(millis, UtcOffset::UTC).expect("utc");
        assert_eq!(utc.to_string(), "2013-04-09");

        let east = CalendarDay::from_unix_millis(millis, offset!(+2)).expect("east");
        assert_eq!(east.to_string(), "2013-04-10");

        let west = CalendarDay::from_unix_millis(millis, offset!(-5)).expect("west");
        assert_eq!(west.to_string(), "2013-04-09");
    }

    #[test]
    fn rejects_timestamp_outside_calendar() {
        let err = CalendarDay::from_unix_millis(i64::MAX, UtcOffset::UTC).expect_err("must fail");
        assert!(matches!(err, ValidationError::TimestampOutOfRange { .. }));
    }

    #[test]
    fn midnight_millis_round_trips_through_conversion() {
        let day = CalendarDay::parse("2010-08-05").expect("day");
        let millis = day.unix_millis_at_midnight();
        assert_eq!(millis, 1_280_966_400_000);
        assert_eq!(
            CalendarDay::from_unix_millis(millis, UtcOffset::UTC).expect("utc"),
            day
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let day = CalendarDay::parse("2012-11-28").expect("day");
        let json = serde_json::to_string(&day).expect("serialize");
        assert_eq!(json, "\"2012-11-28\"");
        let back: CalendarDay = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, day);
        assert!(serde_json::from_str::<CalendarDay>("\"2012-11-31\"").is_err());
    }
}
