//! Render command implementation.
//!
//! The render command:
//! 1. Reads the path listing file
//! 2. Builds the structural tree
//! 3. Optionally parses a trace log and projects it onto the tree
//! 4. Optionally applies a substring search filter
//! 5. Writes the resulting tree document to JSON

use crate::filter::{filter_by_match, filter_by_trace};
use crate::output::json::{to_document, write_tree};
use crate::parser::{parse_path_listing, parse_trace_log, NamespaceMap, TreeNode};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the render command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct RenderArgs {
    /// Path listing file (one path per line)
    pub paths_file: PathBuf,

    /// Optional trace log file
    pub trace_file: Option<PathBuf>,

    /// Optional search term
    pub search_term: Option<String>,

    /// Output path for the JSON tree document
    pub output_json: PathBuf,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            paths_file: PathBuf::new(),
            trace_file: None,
            search_term: None,
            output_json: PathBuf::from("tree.json"),
            print_summary: false,
        }
    }
}

/// Execute the render command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * File read errors
/// * Parse errors (empty path listing, unusable trace log)
/// * File write errors
pub fn execute_render(args: RenderArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Rendering tree from: {}", args.paths_file.display());

    // Step 1: Build the structural tree from the path listing
    info!("Step 1/4: Building path tree...");
    let tree = read_path_tree(&args.paths_file)?;
    debug!("Path tree has {} nodes", tree.node_count());

    // Step 2: Parse the trace log, if given
    let namespaces = match &args.trace_file {
        Some(path) => {
            info!("Step 2/4: Parsing trace log: {}", path.display());
            Some(read_namespaces(path)?)
        }
        None => {
            info!("Step 2/4: No trace log given, skipping");
            None
        }
    };

    // Step 3: Apply filters - trace projection first, then search
    info!("Step 3/4: Applying filters...");
    let filtered = filter_by_trace(&tree, namespaces.as_ref());
    let filtered = match args.search_term.as_deref() {
        Some(term) if !term.is_empty() => filter_by_match(&filtered, term),
        _ => filtered,
    };

    debug!("Filtered tree has {} nodes", filtered.node_count());

    // Step 4: Write output
    info!("Step 4/4: Writing output...");
    let node_count = filtered.node_count();
    let total_calls = filtered
        .trace_data
        .as_ref()
        .map(|d| d.total_n_calls)
        .unwrap_or(0);

    let document = to_document(filtered);
    write_tree(&document, &args.output_json).context("Failed to write tree JSON")?;

    info!("✓ Tree written to: {}", args.output_json.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(60));
        println!("TREE SUMMARY");
        println!("{}", "=".repeat(60));
        println!("Root:        {}", document.root.name);
        println!("Nodes:       {}", node_count);
        if let Some(namespaces) = &namespaces {
            println!("Namespaces:  {}", namespaces.len());
            println!("Total calls: {}", total_calls);
        }
        if let Some(term) = &args.search_term {
            println!("Search term: {:?}", term);
        }
        println!("{}", "=".repeat(60));
    }

    let elapsed = start_time.elapsed();
    info!("Render completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Read and parse the path listing file
///
/// **Private** - internal helper for execute_render
fn read_path_tree(path: &PathBuf) -> Result<TreeNode> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read path listing {}", path.display()))?;

    parse_path_listing(&content)
        .with_context(|| format!("Failed to parse path listing {}", path.display()))
}

/// Read and parse the trace log file
///
/// **Private** - internal helper for execute_render
fn read_namespaces(path: &PathBuf) -> Result<NamespaceMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace log {}", path.display()))?;

    parse_trace_log(&content)
        .with_context(|| format!("Failed to parse trace log {}", path.display()))
}

/// Validate render arguments
///
/// **Public** - can be called before execute_render for early validation
pub fn validate_args(args: &RenderArgs) -> Result<()> {
    if args.paths_file.as_os_str().is_empty() {
        anyhow::bail!("Path listing file is required");
    }

    if !args.paths_file.exists() {
        anyhow::bail!("Path listing file not found: {}", args.paths_file.display());
    }

    if let Some(trace_file) = &args.trace_file {
        if !trace_file.exists() {
            anyhow::bail!("Trace log file not found: {}", trace_file.display());
        }
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    Ok(())
}
