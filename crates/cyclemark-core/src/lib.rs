//! # Cyclemark Core
//!
//! Market cycle timelines and price-driven boundary refinement.
//!
//! ## Overview
//!
//! This crate maintains a chronologically ordered, non-overlapping timeline of
//! bull and bear regimes and corrects their boundaries against a daily price
//! series:
//!
//! - **Domain models** for calendar days, cycles and price observations
//! - **Price series** with date lookup and window/range queries
//! - **Cycle timeline** with chronological insertion and overlap normalization
//! - **Boundary refinement** snapping cycle ends to local price extrema
//! - **Exploratory queries** proposing new bull runs and bear markets
//!
//! Reading and writing the persisted documents is left to the caller; this
//! crate only works on in-memory values and their record shapes.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Refinement settings and date conversion rules |
//! | [`domain`] | Domain models (CalendarDay, Cycle, PricePoint) |
//! | [`error`] | Core error types |
//! | [`explore`] | Bull run / bear market proposals |
//! | [`refine`] | Boundary refinement |
//! | [`series`] | Daily price series |
//! | [`timeline`] | Ordered cycle timeline |
//!
//! ## Quick Start
//!
//! ```rust
//! use cyclemark_core::{
//!     BoundaryRefiner, CalendarDay, Cycle, CycleKind, CycleTimeline, PriceRecord, PriceSeries,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let timeline = CycleTimeline::new(vec![Cycle::parse(
//!     CycleKind::Bull,
//!     "2012-11-28",
//!     "2013-04-09",
//!     "Second run",
//! )?]);
//!
//! // Insert a manually specified cycle.
//! let timeline = timeline.insert(Cycle::parse(
//!     CycleKind::Bear,
//!     "2011-06-10",
//!     "2011-11-20",
//!     "First bear market",
//! )?);
//! assert_eq!(timeline.cycles()[0].kind(), CycleKind::Bear);
//!
//! // Snap boundaries to the observed extrema.
//! let peak = CalendarDay::parse("2013-04-10")?.unix_millis_at_midnight();
//! let series = PriceSeries::build(vec![PriceRecord::new(peak, 230.0)])?;
//! let refined = BoundaryRefiner::default().refine(&timeline, &series);
//! assert_eq!(refined.cycles()[1].end_date().to_string(), "2013-04-10");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Invalid input is rejected when values are constructed, with a
//! [`ValidationError`]. Timeline operations and refinement never fail once
//! their inputs exist; missing price coverage simply leaves a boundary where
//! it was.

pub mod config;
pub mod domain;
pub mod error;
pub mod explore;
pub mod refine;
pub mod series;
pub mod timeline;

// Configuration
pub use config::{DateRule, RefineConfig, DEFAULT_WINDOW_RADIUS_DAYS};

// Domain models
pub use domain::{
    CalendarDay, Cycle, CycleKind, CycleRecord, PriceHistory, PricePoint, PriceRecord,
};

// Error types
pub use error::{CoreError, ValidationError};

// Exploratory queries
pub use explore::{propose_bear_market, propose_bull_run, BearMarketProposal, BullRunProposal};

// Refinement
pub use refine::{refine, BoundaryRefiner};

// Price series
pub use series::{Extremum, PriceSeries, PriceWindow};

// Timeline
pub use timeline::CycleTimeline;
