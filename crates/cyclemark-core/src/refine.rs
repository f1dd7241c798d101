//! Snap cycle boundaries to local price extrema.

use rayon::prelude::*;

use crate::{
    CalendarDay, Cycle, CycleTimeline, PricePoint, PriceSeries, RefineConfig,
    DEFAULT_WINDOW_RADIUS_DAYS,
};

/// Moves each cycle's end date to the price extremum found around it.
///
/// Bull cycles end on the highest price within the window, bear cycles on the
/// lowest. Start dates are then re-derived from the refined ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryRefiner {
    window_radius_days: u32,
}

impl Default for BoundaryRefiner {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_RADIUS_DAYS)
    }
}

impl BoundaryRefiner {
    pub fn new(window_radius_days: u32) -> Self {
        Self { window_radius_days }
    }

    pub fn from_config(config: &RefineConfig) -> Self {
        Self::new(config.window_radius_days)
    }

    pub fn window_radius_days(&self) -> u32 {
        self.window_radius_days
    }

    /// Extremum for `cycle` in the window around its current end date, or
    /// `None` when the window holds no observations.
    pub fn locate(&self, cycle: &Cycle, series: &PriceSeries) -> Option<PricePoint> {
        series.extremum_in_window(
            cycle.end_date(),
            self.window_radius_days,
            cycle.kind().terminal_extremum(),
        )
    }

    /// Refined end date for `cycle`; unchanged when there is no data.
    pub fn refined_end(&self, cycle: &Cycle, series: &PriceSeries) -> CalendarDay {
        match self.locate(cycle, series) {
            Some(point) => {
                if point.day != cycle.end_date() {
                    tracing::debug!(
                        label = cycle.label(),
                        kind = %cycle.kind(),
                        from = %cycle.end_date(),
                        to = %point.day,
                        price = point.price,
                        "snapped cycle boundary"
                    );
                }
                point.day
            }
            None => {
                tracing::debug!(
                    label = cycle.label(),
                    end = %cycle.end_date(),
                    radius_days = self.window_radius_days,
                    "no prices around cycle boundary, keeping end date"
                );
                cycle.end_date()
            }
        }
    }

    /// Refine every end date independently, then rebuild every start date
    /// after the first as the day following the previous end.
    pub fn refine(&self, timeline: &CycleTimeline, series: &PriceSeries) -> CycleTimeline {
        let ends: Vec<CalendarDay> = timeline
            .cycles()
            .par_iter()
            .map(|cycle| self.refined_end(cycle, series))
            .collect();

        let refined = timeline.rechain_with_ends(ends);
        tracing::debug!(
            cycles = refined.len(),
            radius_days = self.window_radius_days,
            "refined timeline boundaries"
        );
        refined
    }

    /// Refine independent timelines against the same series in parallel.
    pub fn refine_all(
        &self,
        timelines: &[CycleTimeline],
        series: &PriceSeries,
    ) -> Vec<CycleTimeline> {
        timelines
            .par_iter()
            .map(|timeline| self.refine(timeline, series))
            .collect()
    }
}

/// Refine `timeline` against `series` with the given window radius.
pub fn refine(
    timeline: &CycleTimeline,
    series: &PriceSeries,
    window_radius_days: u32,
) -> CycleTimeline {
    BoundaryRefiner::new(window_radius_days).refine(timeline, series)
}
