//! Refinement settings and timestamp-to-day conversion rules.

use std::env;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::{CalendarDay, ValidationError};

/// Environment key overriding [`RefineConfig::window_radius_days`].
pub const WINDOW_RADIUS_ENV: &str = "CYCLEMARK_WINDOW_RADIUS_DAYS";
/// Environment key selecting the date rule: `local`, `utc` or a fixed offset
/// such as `+02:00`.
pub const UTC_OFFSET_ENV: &str = "CYCLEMARK_UTC_OFFSET";

pub const DEFAULT_WINDOW_RADIUS_DAYS: u32 = 60;

/// How an epoch-millisecond timestamp is reduced to a calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub enum DateRule {
    /// Calendar date of the instant in UTC.
    #[default]
    Utc,
    /// Calendar date in the host's local time zone, daylight saving included.
    Local,
    /// Calendar date at a fixed offset from UTC.
    FixedOffset(UtcOffset),
    /// Caller-supplied conversion; `None` rejects the timestamp.
    Custom(fn(i64) -> Option<CalendarDay>),
}

impl DateRule {
    pub fn day_of(self, timestamp_millis: i64) -> Result<CalendarDay, ValidationError> {
        match self {
            Self::Utc => CalendarDay::from_unix_millis(timestamp_millis, UtcOffset::UTC),
            Self::Local => {
                let offset = local_offset_at(timestamp_millis)?;
                CalendarDay::from_unix_millis(timestamp_millis, offset)
            }
            Self::FixedOffset(offset) => CalendarDay::from_unix_millis(timestamp_millis, offset),
            Self::Custom(rule) => rule(timestamp_millis).ok_or(
                ValidationError::TimestampOutOfRange {
                    millis: timestamp_millis,
                },
            ),
        }
    }
}

fn local_offset_at(timestamp_millis: i64) -> Result<UtcOffset, ValidationError> {
    let instant =
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(timestamp_millis) * 1_000_000)
            .map_err(|_| ValidationError::TimestampOutOfRange {
                millis: timestamp_millis,
            })?;
    UtcOffset::local_offset_at(instant).map_err(|_| ValidationError::IndeterminateLocalOffset {
        millis: timestamp_millis,
    })
}

/// Boundary refinement settings.
#[derive(Debug, Clone, Copy)]
pub struct RefineConfig {
    /// Half-width of the extremum search window around a coarse boundary.
    pub window_radius_days: u32,
    /// Rule used when building price series from raw timestamps.
    pub date_rule: DateRule,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            window_radius_days: DEFAULT_WINDOW_RADIUS_DAYS,
            date_rule: DateRule::Utc,
        }
    }
}

impl RefineConfig {
    /// Defaults overridden by `CYCLEMARK_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each known key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(WINDOW_RADIUS_ENV).filter(|raw| !raw.trim().is_empty()) {
            let radius = raw.trim().parse::<u32>();
            config.window_radius_days = radius.map_err(|_| ValidationError::InvalidConfig {
                key: WINDOW_RADIUS_ENV,
                value: raw.clone(),
            })?;
        }

        if let Some(raw) = lookup(UTC_OFFSET_ENV).filter(|raw| !raw.trim().is_empty()) {
            config.date_rule = parse_date_rule(&raw)?;
        }

        Ok(config)
    }

    pub fn with_window_radius_days(mut self, window_radius_days: u32) -> Self {
        self.window_radius_days = window_radius_days;
        self
    }

    pub fn with_date_rule(mut self, date_rule: DateRule) -> Self {
        self.date_rule = date_rule;
        self
    }
}

fn parse_date_rule(raw: &str) -> Result<DateRule, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("local") {
        return Ok(DateRule::Local);
    }
    if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
        return Ok(DateRule::FixedOffset(UtcOffset::UTC));
    }

    UtcOffset::parse(
        trimmed,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .map(DateRule::FixedOffset)
    .map_err(|_| ValidationError::InvalidConfig {
        key: UTC_OFFSET_ENV,
        value: raw.to_owned(),
    })
}
