//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// hgtdeps - provision the DIAMOND and MMseqs2 binaries FlexiHGT relies on.
#[derive(Debug, Parser)]
#[command(name = "hgtdeps")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Manifest listing the binaries to provision (defaults to the built-in list)
    #[arg(short, long, global = true, env = "HGTDEPS_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Directory to install binaries into (overrides the manifest's install_dir)
    #[arg(long, global = true, env = "HGTDEPS_INSTALL_DIR")]
    pub install_dir: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download and install missing binaries (default if no command specified)
    Install(InstallArgs),

    /// Verify binaries, Python modules and the ete3 taxonomy database
    Check(CheckArgs),

    /// List manifest entries and whether each is installed
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// Reinstall even if the binary is already present
    #[arg(short, long)]
    pub force: bool,

    /// Show what would be installed without downloading anything
    #[arg(long)]
    pub dry_run: bool,

    /// Number of dependencies to provision concurrently
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Per-download timeout in seconds (overrides the manifest)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Provision only these dependencies (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

impl Default for InstallArgs {
    fn default() -> Self {
        Self {
            force: false,
            dry_run: false,
            jobs: 1,
            timeout: None,
            only: Vec::new(),
        }
    }
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Only check binaries; skip Python modules and the taxonomy database
    #[arg(long)]
    pub skip_python: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
