//! RemindHub analytics core — funnel transition durations, period-over-period
//! comparisons, source/status distributions, and dashboard view models.
//!
//! Everything here is a pure projection over immutable input snapshots:
//! free functions in, view models out, no retained state.

pub mod audit;
pub mod chats;
pub mod comparison;
pub mod dashboard;
pub mod distribution;
pub mod funnel;
pub mod timeseries;

pub use audit::read_status_changes;
pub use comparison::compare_periods;
pub use dashboard::build_overview;
pub use funnel::{collect_transition_durations, summarize_funnel};
