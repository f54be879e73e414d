//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use agentconf_engine::DEFAULT_BATCH_SIZE;

/// Discover environment-variable declarations across packages and synthesize
/// them into each package's manifest
#[derive(Debug, Parser)]
#[command(name = "agentconf", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process every repository in a GitHub organization
    Org(OrgArgs),
    /// Process already-checked-out package directories
    Local(LocalArgs),
}

#[derive(Debug, Args)]
pub struct OrgArgs {
    /// GitHub organization to enumerate
    #[arg(long)]
    pub org: String,

    /// Branch manifests are read from and written to
    #[arg(long, default_value = "main")]
    pub branch: String,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Args)]
pub struct LocalArgs {
    /// Package working trees to analyze
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Knobs shared by both modes
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Process at most this many packages
    #[arg(long)]
    pub limit: Option<usize>,

    /// Concurrent extraction calls per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Pause between batches, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub batch_delay_ms: u64,

    /// Bump the -beta.N component instead of the patch component
    #[arg(long)]
    pub beta: bool,
}
