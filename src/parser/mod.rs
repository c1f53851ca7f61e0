//! Input parsing and schema definitions.
//!
//! This module handles:
//! - Parsing path listings into a tree
//! - Parsing call/return trace logs into namespace statistics
//! - Defining the shared tree and output schema

pub mod paths;
pub mod schema;
pub mod trace_log;

// Re-export main types
pub use paths::{build_path_tree, parse_path_listing};
pub use schema::{
    CallRecord, DisplayState, FunctionRecord, NamespaceMap, NamespaceRecord, ReturnValue,
    TraceData, TreeDocument, TreeNode,
};
pub use trace_log::parse_trace_log;
