//! Tree filters and statistics propagation.
//!
//! Filters take a tree by reference and return a new pruned tree; the
//! input is never mutated. When both filters apply, run the trace filter
//! first - search marking assumes trace annotations are already final.

pub mod search;
pub mod stats;
pub mod trace;

// Re-export main functions
pub use search::filter_by_match;
pub use stats::propagate_stats;
pub use trace::filter_by_trace;
