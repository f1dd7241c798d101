//! One-shot exploratory queries for proposing new cycles.
//!
//! These answer "where did the rally start and peak?" or "where did the bear
//! market bottom?" for a hand-picked period. The proposals convert into
//! [`Cycle`] values ready for [`CycleTimeline::insert`](crate::CycleTimeline::insert).

use crate::{CalendarDay, Cycle, CycleKind, Extremum, PricePoint, PriceSeries, ValidationError};

/// Candidate bull run: trough early in the period, peak late in the period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BullRunProposal {
    pub trough: PricePoint,
    pub peak: PricePoint,
}

impl BullRunProposal {
    /// Relative change from trough to peak (`1.0` = +100%).
    pub fn change(&self) -> Option<f64> {
        relative_change(self.trough.price, self.peak.price)
    }

    pub fn into_cycle(self, label: impl Into<String>) -> Result<Cycle, ValidationError> {
        Cycle::new(CycleKind::Bull, self.trough.day, self.peak.day, label)
    }
}

/// Candidate bear market: from the start of the period to its lowest price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BearMarketProposal {
    pub start: CalendarDay,
    pub start_price: Option<f64>,
    pub trough: PricePoint,
}

impl BearMarketProposal {
    /// Relative change from the first observed price of the period to the trough.
    pub fn change(&self) -> Option<f64> {
        self.start_price
            .and_then(|start| relative_change(start, self.trough.price))
    }

    pub fn into_cycle(self, label: impl Into<String>) -> Result<Cycle, ValidationError> {
        Cycle::new(CycleKind::Bear, self.start, self.trough.day, label)
    }
}

/// Propose a bull run inside `period_start..=period_end`.
///
/// The trough is the lowest price on or before `trough_until`, the peak the
/// highest price on or after `peak_from`, both restricted to the period.
/// Returns `None` when either sub-window has no observations.
pub fn propose_bull_run(
    series: &PriceSeries,
    period_start: CalendarDay,
    period_end: CalendarDay,
    trough_until: CalendarDay,
    peak_from: CalendarDay,
) -> Option<BullRunProposal> {
    let trough = series
        .prices_between(period_start, trough_until.min(period_end))
        .extremum(Extremum::Minimum)?;
    let peak = series
        .prices_between(peak_from.max(period_start), period_end)
        .extremum(Extremum::Maximum)?;

    tracing::debug!(
        trough = %trough.day,
        trough_price = trough.price,
        peak = %peak.day,
        peak_price = peak.price,
        "proposed bull run"
    );
    Some(BullRunProposal { trough, peak })
}

/// Propose a bear market starting at `period_start` and ending on the lowest
/// price observed in `period_start..=period_end`.
pub fn propose_bear_market(
    series: &PriceSeries,
    period_start: CalendarDay,
    period_end: CalendarDay,
) -> Option<BearMarketProposal> {
    let window = series.prices_between(period_start, period_end);
    let start_price = window.clone().next().map(|point| point.price);
    let trough = window.extremum(Extremum::Minimum)?;

    tracing::debug!(
        start = %period_start,
        trough = %trough.day,
        trough_price = trough.price,
        "proposed bear market"
    );
    Some(BearMarketProposal {
        start: period_start,
        start_price,
        trough,
    })
}

fn relative_change(from: f64, to: f64) -> Option<f64> {
    (from > 0.0).then(|| (to - from) / from)
}
