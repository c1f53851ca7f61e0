//! Output writers for tree documents.

pub mod json;

// Re-export main functions
pub use json::{read_tree, write_tree};
