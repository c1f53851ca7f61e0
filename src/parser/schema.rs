//! Schema definitions for the tree and trace data model.
//!
//! This module defines the structures shared by the parsers, the filters,
//! and the JSON output. Output schema is versioned to allow future evolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map of namespace name to its aggregated call statistics
pub type NamespaceMap = BTreeMap<String, NamespaceRecord>;

/// One node of the codebase tree
///
/// A node's identity is its root-to-node name path; no two siblings
/// share a name. Children keep first-seen insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Path segment label, unique among siblings
    pub name: String,

    /// Child nodes in insertion order
    pub children: Vec<TreeNode>,

    /// Aggregated call statistics, attached by the trace filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_data: Option<TraceData>,

    /// Transient display flags, scoped to a single filter pass
    #[serde(skip)]
    pub display: DisplayState,
}

// Display flags are filter-pass-scoped, not part of a node's identity
impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.children == other.children
            && self.trace_data == other.trace_data
    }
}

impl TreeNode {
    /// Create a node with no children and default display state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            trace_data: None,
            display: DisplayState::default(),
        }
    }

    /// Total number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// True if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Per-node display flags
///
/// `included` is only meaningful while a filter pass runs; every tree
/// returned from a filter has it cleared on all nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayState {
    /// Whether the renderer should show this node collapsed
    pub collapsed: bool,

    /// Marks a node that must survive pruning in the current pass
    pub included: bool,
}

impl DisplayState {
    /// State for freshly created non-root nodes
    pub fn collapsed() -> Self {
        Self {
            collapsed: true,
            included: false,
        }
    }

    /// State for nodes that should start expanded
    pub fn expanded() -> Self {
        Self {
            collapsed: false,
            included: false,
        }
    }
}

/// Aggregated call statistics attached to a tree node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraceData {
    /// Sum of call counts over the subtree
    pub total_n_calls: u64,

    /// Minimum leaf total within the subtree
    #[serde(default)]
    pub min_n_calls: u64,

    /// Maximum leaf total within the subtree
    #[serde(default)]
    pub max_n_calls: u64,

    /// Function name to its call records
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub functions: BTreeMap<String, FunctionRecord>,
}

/// Calls observed for a single function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Function name
    pub name: String,

    /// Number of recorded call activations
    pub n_calls: u64,

    /// Trace id to call record
    pub calls: BTreeMap<String, CallRecord>,
}

/// One call activation from the trace log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// 1-based line number of the call line
    pub line_num: usize,

    /// Nesting depth encoded by the line's depth markers
    pub depth: usize,

    /// Return value, present only when a matching return line was seen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<ReturnValue>,
}

/// Value carried by a matched return line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnValue {
    pub value: String,
}

/// Statistics for one namespace, keyed by namespace in a [`NamespaceMap`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceRecord {
    /// Slash form of the dotted namespace
    pub file_prefix: String,

    /// Function name to its call records
    pub functions: BTreeMap<String, FunctionRecord>,

    /// Sum of `n_calls` across all functions
    pub total_n_calls: u64,
}

/// Top-level tree document written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDocument {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the document was generated
    pub generated_at: String,

    /// Root of the (possibly filtered and annotated) tree
    pub root: TreeNode,
}
