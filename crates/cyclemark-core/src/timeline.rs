//! Chronologically ordered cycle timeline.
//!
//! Every operation returns a new [`CycleTimeline`]; the receiver is never
//! modified, so a caller's working copy stays intact until it chooses to
//! replace it.

use serde::{Deserialize, Serialize};

use crate::{CalendarDay, CoreError, Cycle, CycleRecord, ValidationError};

/// Cycles ordered by ascending start date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Cycle>", into = "Vec<Cycle>")]
pub struct CycleTimeline {
    cycles: Vec<Cycle>,
}

impl CycleTimeline {
    /// Order `cycles` by start date. Cycles sharing a start date keep their
    /// input order. No overlap resolution happens here.
    pub fn new(mut cycles: Vec<Cycle>) -> Self {
        cycles.sort_by_key(Cycle::start_date);
        Self { cycles }
    }

    pub fn from_records<I>(records: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = CycleRecord>,
    {
        let cycles = records
            .into_iter()
            .map(Cycle::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(cycles))
    }

    pub fn to_records(&self) -> Vec<CycleRecord> {
        self.cycles.iter().cloned().map(CycleRecord::from).collect()
    }

    /// Parse a JSON array of cycle records.
    pub fn from_json(input: &str) -> Result<Self, CoreError> {
        let records: Vec<CycleRecord> = serde_json::from_str(input)?;
        Ok(Self::from_records(records)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(&self.cycles)?)
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cycle> {
        self.cycles.iter()
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn into_vec(self) -> Vec<Cycle> {
        self.cycles
    }

    /// The cycle whose range contains `day`, if any.
    pub fn cycle_at(&self, day: CalendarDay) -> Option<&Cycle> {
        let candidates = self
            .cycles
            .partition_point(|cycle| cycle.start_date() <= day);
        self.cycles[..candidates]
            .iter()
            .rev()
            .find(|cycle| cycle.contains(day))
    }

    /// Whether every adjacent pair is strictly disjoint and ordered.
    ///
    /// Only fails after [`normalize`](Self::normalize) when several cycles are
    /// stacked on [`CalendarDay::MAX`], where no later start day exists.
    pub fn is_normalized(&self) -> bool {
        self.cycles
            .windows(2)
            .all(|pair| pair[1].start_date() > pair[0].end_date())
    }

    /// Insert `cycle` chronologically, then [`normalize`](Self::normalize).
    ///
    /// The new cycle goes before the first existing cycle that starts strictly
    /// later, or last if there is none. Overlaps are never rejected; they are
    /// resolved by pushing later start dates forward.
    pub fn insert(&self, cycle: Cycle) -> Self {
        let position = self
            .cycles
            .iter()
            .position(|existing| cycle.start_date() < existing.start_date())
            .unwrap_or(self.cycles.len());

        tracing::debug!(
            label = cycle.label(),
            kind = %cycle.kind(),
            start = %cycle.start_date(),
            end = %cycle.end_date(),
            position,
            "inserting cycle"
        );

        let mut cycles = Vec::with_capacity(self.cycles.len() + 1);
        cycles.extend_from_slice(&self.cycles[..position]);
        cycles.push(cycle);
        cycles.extend_from_slice(&self.cycles[position..]);

        Self::new(cycles).normalize()
    }

    /// Single left-to-right sweep that pushes the start of any cycle beginning
    /// on or before its predecessor's end to the day after that end.
    ///
    /// End dates are kept, except when the pushed start passes a cycle's own
    /// end; that cycle collapses onto its new start day. A cycle overlapping a
    /// predecessor that ends on [`CalendarDay::MAX`] is left in place.
    pub fn normalize(&self) -> Self {
        let mut adjusted = 0_usize;
        let mut cycles: Vec<Cycle> = Vec::with_capacity(self.cycles.len());
        for cycle in &self.cycles {
            let next = match cycles.last() {
                Some(previous) if cycle.start_date() <= previous.end_date() => {
                    match day_after(previous, cycle) {
                        Some(start) => {
                            adjusted += 1;
                            cycle.spanning(start, cycle.end_date())
                        }
                        None => cycle.clone(),
                    }
                }
                _ => cycle.clone(),
            };
            cycles.push(next);
        }

        tracing::debug!(cycles = cycles.len(), adjusted, "normalized timeline");
        Self { cycles }
    }

    /// Re-derive every start date after the first from its predecessor's end.
    ///
    /// Unlike [`normalize`](Self::normalize) this also closes gaps: the result
    /// is a gapless chain where each cycle starts the day after the previous
    /// one ends.
    pub fn rechain(&self) -> Self {
        self.rechain_with_ends(self.cycles.iter().map(Cycle::end_date))
    }

    pub(crate) fn rechain_with_ends<I>(&self, ends: I) -> Self
    where
        I: IntoIterator<Item = CalendarDay>,
    {
        let mut cycles: Vec<Cycle> = Vec::with_capacity(self.cycles.len());
        for (cycle, end) in self.cycles.iter().zip(ends) {
            let start = match cycles.last() {
                Some(previous) => day_after(previous, cycle).unwrap_or(CalendarDay::MAX),
                None => cycle.start_date(),
            };
            cycles.push(cycle.spanning(start, end));
        }
        Self { cycles }
    }
}

/// Day after `previous` ends, or `None` when it ends on the last calendar day.
fn day_after(previous: &Cycle, cycle: &Cycle) -> Option<CalendarDay> {
    let start = previous.end_date().checked_next_day();
    if start.is_none() {
        tracing::warn!(
            label = cycle.label(),
            previous = previous.label(),
            "previous cycle ends on the last calendar day, start cannot move past it"
        );
    }
    start
}

impl From<Vec<Cycle>> for CycleTimeline {
    fn from(value: Vec<Cycle>) -> Self {
        Self::new(value)
    }
}

impl From<CycleTimeline> for Vec<Cycle> {
    fn from(value: CycleTimeline) -> Self {
        value.cycles
    }
}

impl FromIterator<Cycle> for CycleTimeline {
    fn from_iter<I: IntoIterator<Item = Cycle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CycleTimeline {
    type Item = &'a Cycle;
    type IntoIter = std::slice::Iter<'a, Cycle>;

    fn into_iter(self) -> Self::IntoIter {
        self.cycles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CycleKind;

    fn day(value: &str) -> CalendarDay {
        CalendarDay::parse(value).expect("valid day")
    }

    fn cycle(kind: CycleKind, start: &str, end: &str, label: &str) -> Cycle {
        Cycle::parse(kind, start, end, label).expect("valid cycle")
    }

    fn spans(timeline: &CycleTimeline) -> Vec<(String, String)> {
        timeline
            .iter()
            .map(|cycle| (cycle.start_date().to_string(), cycle.end_date().to_string()))
            .collect()
    }

    #[test]
    fn new_sorts_by_start_date() {
        let timeline = CycleTimeline::new(vec![
            cycle(CycleKind::Bull, "2012-11-28", "2013-04-09", "second run"),
            cycle(CycleKind::Bull, "2010-08-05", "2011-06-09", "first run"),
        ]);
        assert_eq!(timeline.cycles()[0].label(), "first run");
        assert_eq!(timeline.cycles()[1].label(), "second run");
    }

    #[test]
    fn inserts_earlier_cycle_in_front_without_touching_dates() {
        let timeline = CycleTimeline::new(vec![cycle(
            CycleKind::Bull,
            "2012-11-28",
            "2013-04-09",
            "second run",
        )]);

        let updated = timeline.insert(cycle(CycleKind::Bear, "2011-06-10", "2011-11-20", "first bear"));

        assert_eq!(
            spans(&updated),
            vec![
                ("2011-06-10".to_owned(), "2011-11-20".to_owned()),
                ("2012-11-28".to_owned(), "2013-04-09".to_owned()),
            ]
        );
        assert_eq!(updated.cycles()[0].kind(), CycleKind::Bear);
        assert_eq!(timeline.len(), 1, "receiver is left untouched");
    }

    #[test]
    fn appends_latest_cycle() {
        let timeline = CycleTimeline::new(vec![cycle(
            CycleKind::Bull,
            "2010-08-05",
            "2011-06-09",
            "first run",
        )]);
        let updated = timeline.insert(cycle(CycleKind::Bear, "2011-06-10", "2011-11-20", "first bear"));
        assert_eq!(updated.cycles()[1].label(), "first bear");
        assert!(updated.is_normalized());
    }

    #[test]
    fn equal_start_inserts_after_existing_and_is_pushed_forward() {
        let timeline = CycleTimeline::new(vec![cycle(
            CycleKind::Bull,
            "2010-08-05",
            "2011-06-09",
            "existing",
        )]);
        let updated = timeline.insert(cycle(CycleKind::Bear, "2010-08-05", "2011-11-20", "new"));

        assert_eq!(updated.cycles()[0].label(), "existing");
        assert_eq!(updated.cycles()[1].label(), "new");
        assert_eq!(updated.cycles()[1].start_date(), day("2011-06-10"));
        assert_eq!(updated.cycles()[1].end_date(), day("2011-11-20"));
    }

    #[test]
    fn duplicate_range_is_kept_and_collapsed_not_merged() {
        let original = cycle(CycleKind::Bull, "2010-08-05", "2011-06-09", "run");
        let timeline = CycleTimeline::new(vec![original.clone()]);
        let updated = timeline.insert(original);

        assert_eq!(updated.len(), 2);
        assert_eq!(updated.cycles()[1].start_date(), day("2011-06-10"));
        assert_eq!(updated.cycles()[1].end_date(), day("2011-06-10"));
        assert!(updated.is_normalized());
    }

    #[test]
    fn normalize_pushes_overlapping_start() {
        let timeline = CycleTimeline::new(vec![
            cycle(CycleKind::Bull, "2010-08-05", "2011-06-15", "run"),
            cycle(CycleKind::Bear, "2011-06-09", "2011-11-20", "bear"),
        ]);

        let normalized = timeline.normalize();
        assert_eq!(normalized.cycles()[1].start_date(), day("2011-06-16"));
        assert_eq!(normalized.cycles()[1].end_date(), day("2011-11-20"));
        assert_eq!(normalized.cycles()[0], timeline.cycles()[0]);
    }

    #[test]
    fn normalize_pushes_touching_start() {
        let timeline = CycleTimeline::new(vec![
            cycle(CycleKind::Bull, "2010-08-05", "2011-06-09", "run"),
            cycle(CycleKind::Bear, "2011-06-09", "2011-11-20", "bear"),
        ]);
        assert_eq!(
            timeline.normalize().cycles()[1].start_date(),
            day("2011-06-10")
        );
    }

    #[test]
    fn normalize_leaves_gaps_alone() {
        let timeline = CycleTimeline::new(vec![
            cycle(CycleKind::Bull, "2010-08-05", "2011-06-09", "run"),
            cycle(CycleKind::Bear, "2011-07-01", "2011-11-20", "bear"),
        ]);
        assert_eq!(timeline.normalize(), timeline);
    }

    #[test]
    fn normalize_is_idempotent() {
        let timeline = CycleTimeline::new(vec![
            cycle(CycleKind::Bull, "2010-08-05", "2011-06-15", "a"),
            cycle(CycleKind::Bear, "2011-06-09", "2011-06-12", "b"),
            cycle(CycleKind::Bull, "2011-06-10", "2011-12-01", "c"),
        ]);
        let once = timeline.normalize();
        assert_eq!(once.normalize(), once);
        assert!(once.is_normalized());
    }

    #[test]
    fn cycles_stacked_on_the_last_calendar_day_stay_in_place() {
        let timeline = CycleTimeline::new(vec![
            Cycle::new(CycleKind::Bull, day("9999-12-01"), CalendarDay::MAX, "late run")
                .expect("valid cycle"),
            Cycle::new(CycleKind::Bear, CalendarDay::MAX, CalendarDay::MAX, "last day")
                .expect("valid cycle"),
        ]);

        let normalized = timeline.normalize();
        assert_eq!(normalized, timeline);
        assert!(!normalized.is_normalized());
        assert_eq!(
            spans(&timeline.rechain()),
            vec![
                ("9999-12-01".to_owned(), "9999-12-31".to_owned()),
                ("9999-12-31".to_owned(), "9999-12-31".to_owned()),
            ]
        );
    }

    #[test]
    fn rechain_closes_gaps() {
        let timeline = CycleTimeline::new(vec![
            cycle(CycleKind::Bull, "2010-08-05", "2011-06-09", "run"),
            cycle(CycleKind::Bear, "2011-07-01", "2011-11-20", "bear"),
            cycle(CycleKind::Bull, "2011-12-15", "2013-04-09", "run 2"),
        ]);
        assert_eq!(
            spans(&timeline.rechain()),
            vec![
                ("2010-08-05".to_owned(), "2011-06-09".to_owned()),
                ("2011-06-10".to_owned(), "2011-11-20".to_owned()),
                ("2011-11-21".to_owned(), "2013-04-09".to_owned()),
            ]
        );
    }

    #[test]
    fn cycle_at_finds_containing_regime() {
        let timeline = CycleTimeline::new(vec![
            cycle(CycleKind::Bull, "2010-08-05", "2011-06-09", "run"),
            cycle(CycleKind::Bear, "2011-07-01", "2011-11-20", "bear"),
        ]);
        assert_eq!(
            timeline.cycle_at(day("2011-06-09")).map(Cycle::label),
            Some("run")
        );
        assert_eq!(
            timeline.cycle_at(day("2011-08-01")).map(Cycle::label),
            Some("bear")
        );
        assert!(timeline.cycle_at(day("2011-06-20")).is_none());
        assert!(timeline.cycle_at(day("2009-01-03")).is_none());
    }

    #[test]
    fn empty_timeline_operations_are_empty() {
        let empty = CycleTimeline::default();
        assert!(empty.normalize().is_empty());
        assert!(empty.rechain().is_empty());
        assert!(empty.is_normalized());
    }

    #[test]
    fn json_round_trip_uses_record_shape() {
        let json = r#"[
            {"type": "bull", "startDate": "2012-11-28", "endDate": "2013-04-09", "label": "second run"},
            {"type": "bull", "startDate": "2010-08-05", "endDate": "2011-06-09", "label": "first run"}
        ]"#;
        let timeline = CycleTimeline::from_json(json).expect("timeline");
        assert_eq!(timeline.cycles()[0].label(), "first run");

        let written = timeline.to_json_pretty().expect("json");
        assert!(written.contains("\"startDate\": \"2010-08-05\""));
        let back = CycleTimeline::from_json(&written).expect("round trip");
        assert_eq!(back, timeline);
    }

    #[test]
    fn json_with_inverted_cycle_is_rejected() {
        let json = r#"[{"type": "bear", "startDate": "2011-11-20", "endDate": "2011-06-10", "label": "x"}]"#;
        assert!(matches!(
            CycleTimeline::from_json(json),
            Err(CoreError::Validation(ValidationError::InvertedRange { .. }))
        ));
    }
}
