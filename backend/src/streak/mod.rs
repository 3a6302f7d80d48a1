//! Streak, freeze and milestone computation.
//!
//! Everything in here is pure: callers load a snapshot of day records and
//! freeze state, pass in "today", and render whatever comes back. Nothing is
//! cached between calls, so after any write the caller simply recomputes.

pub mod dates;
pub mod engine;
pub mod heatmap;
pub mod milestone;
pub mod titles;

pub use engine::{compute_snapshot, year_totals, StreakSnapshot};
pub use milestone::{rebase_milestone, should_earn_credit};
