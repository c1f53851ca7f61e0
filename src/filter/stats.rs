//! Bottom-up statistics propagation.
//!
//! Fills every node's `trace_data` so the renderer can normalize call
//! counts into colors anywhere in the tree: totals are summed up from
//! children, min/max track the extrema over descendant leaf totals.

use crate::parser::schema::{TraceData, TreeNode};

/// Propagate call statistics through a subtree, post-order
///
/// **Public** - shared by the trace filter and callers with a finished tree
///
/// Nodes without attached data get an all-zero record; a zero therefore
/// means either "no calls" or "no data" and can pull a subtree minimum
/// down to 0.
///
/// Returns the `(min, max)` leaf totals observed in the subtree.
pub fn propagate_stats(node: &mut TreeNode) -> (u64, u64) {
    let data = node.trace_data.get_or_insert_with(TraceData::default);

    if node.children.is_empty() {
        let value = data.total_n_calls;
        data.min_n_calls = value;
        data.max_n_calls = value;
        return (value, value);
    }

    let mut min = u64::MAX;
    let mut max = 0u64;
    let mut total = 0u64;

    for child in &mut node.children {
        let (child_min, child_max) = propagate_stats(child);
        min = min.min(child_min);
        max = max.max(child_max);
        total += child
            .trace_data
            .as_ref()
            .map(|d| d.total_n_calls)
            .unwrap_or(0);
    }

    let data = node
        .trace_data
        .as_mut()
        .expect("trace_data initialized above");
    data.total_n_calls = total;
    data.min_n_calls = min;
    data.max_n_calls = max;

    (min, max)
}
