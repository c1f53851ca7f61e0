//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Prefix carried by every trace log line
pub const TRACE_LINE_PREFIX: &str = "TRACE ";

/// Character repeated to encode call nesting depth
pub const DEPTH_MARKER: char = '|';

/// Token separating a return line's markers from its value
pub const RETURN_TOKEN: &str = "=>";

// Suffixes tried when resolving the final segment of a dotted namespace
// against file nodes (namespaces omit the source file extension)
pub const SOURCE_FILE_SUFFIXES: &[&str] = &["", ".clj", ".cljs", ".cljc"];

// Top-level wrapper directories skipped before namespace resolution when
// they are the root's only child
pub const ROOT_WRAPPER_SEGMENTS: &[&str] = &["metabase"];
