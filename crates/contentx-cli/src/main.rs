//! contentx CLI
//!
//! Inspects attached content extensions and reconciles their content with
//! the snapshot from the previous run.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;
    tracing::debug!("Verbose mode enabled");

    let Some(command) = cli.command else {
        println!("{} content extension reconciliation", "contentx".green().bold());
        println!();
        println!("Run {} for available commands.", "contentx --help".cyan());
        return Ok(());
    };

    let settings = commands::resolve_settings(&cli.paths)?;

    match command {
        Commands::Status { json } => commands::run_status(settings, json),
        Commands::Diff { json } => commands::run_diff(settings, json),
        Commands::Reconcile { dry_run, json } => {
            commands::run_reconcile(settings, dry_run, json)
        }
        Commands::Dirs { separator } => commands::run_dirs(settings, separator.as_deref()),
    }
}
