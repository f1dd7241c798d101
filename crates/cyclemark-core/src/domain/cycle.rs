use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDay, Extremum, ValidationError};

/// Market regime of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleKind {
    Bull,
    Bear,
}

impl CycleKind {
    pub const ALL: [Self; 2] = [Self::Bull, Self::Bear];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bull => "bull",
            Self::Bear => "bear",
        }
    }

    /// Price extremum that marks the end of this regime: the peak of a bull
    /// run, the trough of a bear market.
    pub const fn terminal_extremum(self) -> Extremum {
        match self {
            Self::Bull => Extremum::Maximum,
            Self::Bear => Extremum::Minimum,
        }
    }
}

impl Display for CycleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CycleKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bull" => Ok(Self::Bull),
            "bear" => Ok(Self::Bear),
            _ => Err(ValidationError::InvalidCycleKind {
                value: value.to_owned(),
            }),
        }
    }
}

/// Wire shape of a cycle as exchanged with the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRecord {
    #[serde(rename = "type", alias = "kind")]
    pub kind: CycleKind,
    pub start_date: CalendarDay,
    pub end_date: CalendarDay,
    #[serde(default)]
    pub label: String,
}

/// One labeled market regime spanning `start_date..=end_date`.
///
/// Cycles are immutable: corrections always produce a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CycleRecord", into = "CycleRecord")]
pub struct Cycle {
    kind: CycleKind,
    start_date: CalendarDay,
    end_date: CalendarDay,
    label: String,
}

impl Cycle {
    pub fn new(
        kind: CycleKind,
        start_date: CalendarDay,
        end_date: CalendarDay,
        label: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if start_date > end_date {
            return Err(ValidationError::InvertedRange {
                start: start_date,
                end: end_date,
            });
        }

        Ok(Self {
            kind,
            start_date,
            end_date,
            label: label.into(),
        })
    }

    /// Build a cycle from `YYYY-MM-DD` strings.
    pub fn parse(
        kind: CycleKind,
        start_date: &str,
        end_date: &str,
        label: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            kind,
            CalendarDay::parse(start_date)?,
            CalendarDay::parse(end_date)?,
            label,
        )
    }

    pub fn kind(&self) -> CycleKind {
        self.kind
    }

    pub fn start_date(&self) -> CalendarDay {
        self.start_date
    }

    pub fn end_date(&self) -> CalendarDay {
        self.end_date
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn contains(&self, day: CalendarDay) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// Inclusive length in days.
    pub fn duration_days(&self) -> i64 {
        self.start_date.days_until(self.end_date) + 1
    }

    /// Copy of this cycle with a different end date.
    pub fn with_end_date(&self, end_date: CalendarDay) -> Result<Self, ValidationError> {
        Self::new(self.kind, self.start_date, end_date, self.label.clone())
    }

    /// Copy of this cycle spanning `start_date..=end_date`.
    ///
    /// An end before the start collapses the cycle onto its start day, so the
    /// result always satisfies `start <= end`.
    pub(crate) fn spanning(&self, start_date: CalendarDay, end_date: CalendarDay) -> Self {
        if end_date < start_date {
            tracing::warn!(
                label = %self.label,
                kind = %self.kind,
                start = %start_date,
                end = %end_date,
                "cycle end precedes its start, collapsing to a single day"
            );
        }

        Self {
            kind: self.kind,
            start_date,
            end_date: end_date.max(start_date),
            label: self.label.clone(),
        }
    }
}

impl TryFrom<CycleRecord> for Cycle {
    type Error = ValidationError;

    fn try_from(value: CycleRecord) -> Result<Self, Self::Error> {
        Self::new(value.kind, value.start_date, value.end_date, value.label)
    }
}

impl From<Cycle> for CycleRecord {
    fn from(value: Cycle) -> Self {
        Self {
            kind: value.kind,
            start_date: value.start_date,
            end_date: value.end_date,
            label: value.label,
        }
    }
}
