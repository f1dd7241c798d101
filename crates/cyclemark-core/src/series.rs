//! Date-keyed daily price series with window and range queries.

use std::collections::btree_map::{self, BTreeMap};
use std::iter::FusedIterator;

use crate::domain::validate_price;
use crate::{CalendarDay, DateRule, PriceHistory, PricePoint, PriceRecord, ValidationError};

/// Which price extremum a search selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extremum {
    Maximum,
    Minimum,
}

impl Extremum {
    /// Whether `candidate` strictly beats `incumbent`. Ties keep the incumbent.
    fn beats(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Self::Maximum => candidate > incumbent,
            Self::Minimum => candidate < incumbent,
        }
    }

    /// Select the extremal point, keeping the earliest point on ties.
    pub fn select<I>(self, points: I) -> Option<PricePoint>
    where
        I: IntoIterator<Item = PricePoint>,
    {
        points.into_iter().fold(None, |best, point| match best {
            Some(incumbent) if !self.beats(point.price, incumbent.price) => Some(incumbent),
            _ => Some(point),
        })
    }
}

/// Immutable daily price series keyed by calendar day.
///
/// Built once from raw observations; when several observations fall on the
/// same day the later one in input order wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: BTreeMap<CalendarDay, f64>,
}

impl PriceSeries {
    /// Build from raw `[timestampMillis, price]` records, dating them in UTC.
    pub fn build<I>(raw: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = PriceRecord>,
    {
        Self::build_with(raw, DateRule::Utc)
    }

    pub fn build_with<I>(raw: I, rule: DateRule) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = PriceRecord>,
    {
        let mut points = BTreeMap::new();
        let mut observations = 0_usize;
        for record in raw {
            validate_price(record.price)?;
            let day = rule.day_of(record.timestamp_millis)?;
            points.insert(day, record.price);
            observations += 1;
        }

        tracing::debug!(
            observations,
            days = points.len(),
            "built daily price series"
        );
        Ok(Self { points })
    }

    pub fn from_history(history: &PriceHistory, rule: DateRule) -> Result<Self, ValidationError> {
        Self::build_with(history.prices.iter().copied(), rule)
    }

    /// Build from already-dated points; later points overwrite earlier ones.
    pub fn from_points<I>(points: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = PricePoint>,
    {
        let mut map = BTreeMap::new();
        for point in points {
            validate_price(point.price)?;
            map.insert(point.day, point.price);
        }
        Ok(Self { points: map })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_day(&self) -> Option<CalendarDay> {
        self.points.keys().next().copied()
    }

    pub fn last_day(&self) -> Option<CalendarDay> {
        self.points.keys().next_back().copied()
    }

    /// Price observed on `day`; `None` marks a hole in the series.
    pub fn price_on(&self, day: CalendarDay) -> Option<f64> {
        self.points.get(&day).copied()
    }

    /// Observations in `center - radius ..= center + radius`, ascending by day.
    pub fn prices_in_window(&self, center: CalendarDay, radius_days: u32) -> PriceWindow<'_> {
        let radius = i64::from(radius_days);
        self.prices_between(center.offset_days(-radius), center.offset_days(radius))
    }

    /// Observations in `start ..= end`, ascending by day. Empty when `start > end`.
    pub fn prices_between(&self, start: CalendarDay, end: CalendarDay) -> PriceWindow<'_> {
        let range = if start <= end {
            self.points.range(start..=end)
        } else {
            self.points.range(start..start)
        };
        PriceWindow { range }
    }

    pub fn iter(&self) -> PriceWindow<'_> {
        PriceWindow {
            range: self.points.range(..),
        }
    }

    pub fn extremum_in_window(
        &self,
        center: CalendarDay,
        radius_days: u32,
        extremum: Extremum,
    ) -> Option<PricePoint> {
        self.prices_in_window(center, radius_days).extremum(extremum)
    }

    /// Highest price ever observed (earliest day on ties).
    pub fn all_time_high(&self) -> Option<PricePoint> {
        self.iter().extremum(Extremum::Maximum)
    }

    /// Most recent observation.
    pub fn latest(&self) -> Option<PricePoint> {
        self.iter().next_back()
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = PricePoint;
    type IntoIter = PriceWindow<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy, restartable view over a contiguous day range of a [`PriceSeries`].
///
/// Cloning the window restarts iteration from its first day.
#[derive(Debug, Clone)]
pub struct PriceWindow<'a> {
    range: btree_map::Range<'a, CalendarDay, f64>,
}

impl PriceWindow<'_> {
    pub fn extremum(self, extremum: Extremum) -> Option<PricePoint> {
        extremum.select(self)
    }
}

impl Iterator for PriceWindow<'_> {
    type Item = PricePoint;

    fn next(&mut self) -> Option<Self::Item> {
        self.range
            .next()
            .map(|(day, price)| PricePoint { day: *day, price: *price })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for PriceWindow<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.range
            .next_back()
            .map(|(day, price)| PricePoint { day: *day, price: *price })
    }
}

impl FusedIterator for PriceWindow<'_> {}
