//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};

/// lu-hut - a friendlier directory lister
#[derive(Parser, Debug)]
#[command(name = "lu")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update lu to the latest release
    Update(UpdateArgs),

    /// Restore the binary replaced by the last update
    Rollback,

    /// Show version information
    Version(VersionArgs),
}

// Update command
#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Check for updates only
    #[arg(long)]
    pub check: bool,

    /// Reinstall even if already on the latest version
    #[arg(long)]
    pub force: bool,
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
