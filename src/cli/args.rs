//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cross-file dependency and service-flow analysis for documentation
#[derive(Parser, Debug)]
#[command(name = "depscribe")]
#[command(about = "Cross-file dependency, call-graph and service-flow analysis")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a codebase and export the dependency map
    Analyze {
        /// Path to the codebase to analyze
        path: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "./depscribe-docs")]
        output: PathBuf,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Glob patterns to include (can be repeated)
        #[arg(long)]
        include: Vec<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (markdown, json, dot, mermaid)
        #[arg(long, default_value = "markdown")]
        format: String,

        /// Combined degree at which a file counts as highly coupled
        #[arg(long)]
        coupling_threshold: Option<usize>,

        /// Skip diagram generation
        #[arg(long)]
        no_diagrams: bool,

        /// Skip service catalog and correlation analysis
        #[arg(long)]
        no_catalog: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show version information
    Version,
}
