//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// contentx - Track attached content extensions and reconcile their content
#[derive(Parser, Debug)]
#[command(name = "contentx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub paths: PathArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Overrides for settings paths
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs {
    /// Settings file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "CONTENTX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keyfile listing attached extensions
    #[arg(long, global = true, env = "CONTENTX_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Directory where extension content is mounted
    #[arg(long, global = true, env = "CONTENTX_EXTENSIONS_DIR")]
    pub extensions_dir: Option<PathBuf>,

    /// Snapshot file from the last reconciliation
    #[arg(long, global = true, env = "CONTENTX_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show attached extensions and the last snapshot
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Preview content changes since the last snapshot
    Diff {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Emit content changes and record the new snapshot
    ///
    /// Changes are printed channel by channel for the host to apply; the
    /// snapshot is only rewritten once all of them were emitted.
    Reconcile {
        /// Show changes without recording the snapshot
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print content directories of attached extensions
    Dirs {
        /// Join directories with this separator instead of newlines
        #[arg(long)]
        separator: Option<String>,
    },
}
