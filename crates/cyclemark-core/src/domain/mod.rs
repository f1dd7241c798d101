//! # Domain Models
//!
//! Canonical value types for market cycles and daily prices.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CalendarDay`] | Calendar date without time component (`YYYY-MM-DD`) |
//! | [`CycleKind`] | Bull or bear regime |
//! | [`Cycle`] | Labeled regime spanning a start and end day |
//! | [`CycleRecord`] | Wire shape of a cycle |
//! | [`PricePoint`] | Price observed on one day |
//! | [`PriceRecord`] | Raw `[timestampMillis, price]` pair |
//! | [`PriceHistory`] | Raw price document (`{"prices": [...]}`) |
//!
//! ## Validation
//!
//! All domain types enforce invariants at construction time:
//!
//! ```rust
//! use cyclemark_core::{Cycle, CycleKind, ValidationError};
//!
//! let cycle = Cycle::parse(CycleKind::Bull, "2012-11-28", "2013-04-09", "Second run")?;
//! assert_eq!(cycle.duration_days(), 133);
//!
//! let inverted = Cycle::parse(CycleKind::Bear, "2011-11-20", "2011-06-10", "inverted");
//! assert!(matches!(inverted, Err(ValidationError::InvertedRange { .. })));
//! # Ok::<(), ValidationError>(())
//! ```

mod cycle;
mod day;
mod price;

pub use cycle::{Cycle, CycleKind, CycleRecord};
pub use day::CalendarDay;
pub(crate) use price::validate_price;
pub use price::{PriceHistory, PricePoint, PriceRecord};
