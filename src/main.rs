//! Trace Tree CLI
//!
//! Builds an annotated codebase tree from a path listing and an optional
//! call/return trace log, and writes it as a JSON document for rendering.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use trace_tree::commands::{execute_render, validate_args, RenderArgs};
use trace_tree::utils::config::SCHEMA_VERSION;

/// Trace Tree - codebase trees annotated with call statistics
#[derive(Parser, Debug)]
#[command(name = "trace-tree")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build, filter, and write a tree document
    Render {
        /// Path listing file (one '/'-separated path per line)
        #[arg(short, long)]
        paths: PathBuf,

        /// Trace log file (TRACE call/return lines)
        #[arg(short, long)]
        trace: Option<PathBuf>,

        /// Case-insensitive substring to filter node names by
        #[arg(short, long)]
        search: Option<String>,

        /// Output path for the JSON tree document
        #[arg(short, long, default_value = "tree.json")]
        output: PathBuf,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a tree document JSON file
    Validate {
        /// Path to tree document JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Render {
            paths,
            trace,
            search,
            output,
            summary,
        } => {
            let args = RenderArgs {
                paths_file: paths,
                trace_file: trace,
                search_term: search,
                output_json: output,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_render(args)?;
        }

        Commands::Validate { file } => {
            validate_tree_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a tree document JSON file
///
/// **Private** - internal command implementation
fn validate_tree_file(file_path: PathBuf) -> Result<()> {
    use trace_tree::output::read_tree;

    println!("Validating tree document: {}", file_path.display());

    let document = read_tree(&file_path)?;

    println!("✓ Valid tree document");
    println!("  Version: {}", document.version);
    println!("  Generated: {}", document.generated_at);
    println!("  Root: {}", document.root.name);
    println!("  Nodes: {}", document.root.node_count());
    if let Some(data) = &document.root.trace_data {
        println!("  Total calls: {}", data.total_n_calls);
        println!("  Leaf calls: {} .. {}", data.min_n_calls, data.max_n_calls);
    }

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("Trace Tree Document Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string        - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string   - ISO 8601 timestamp");
        println!("  root: object           - Tree root node");
        println!("    name: string         - Path segment label");
        println!("    children: array      - Child nodes, insertion order");
        println!("    trace_data: object?  - Aggregated call statistics");
        println!("      total_n_calls: number - Subtree call total");
        println!("      min_n_calls: number   - Minimum leaf total in subtree");
        println!("      max_n_calls: number   - Maximum leaf total in subtree");
        println!("      functions: object?    - Function name -> call records");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Trace Tree v{}", env!("CARGO_PKG_VERSION"));
    println!("Document Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Builds annotated codebase trees from path listings and trace logs.");
}
