//! Trace Tree
//!
//! Builds a hierarchical tree of a codebase's namespace/file structure
//! from a flat path listing, annotates it with call statistics parsed
//! from execution trace logs, and filters it by substring search or
//! trace-driven projection.
//!
//! This crate provides the core implementation for the `trace-tree`
//! CLI tool; the tree documents it writes are consumed by an external
//! renderer.

pub mod commands;
pub mod filter;
pub mod output;
pub mod parser;
pub mod utils;
