//! Dirs command implementation
//!
//! Prints the content directories of attached extensions, e.g. for a host
//! that searches them as fallback content locations.

use std::io::Write;

use contentx_core::{Reconciler, Settings};

use crate::error::Result;

/// Run the dirs command
pub fn run_dirs(settings: Settings, separator: Option<&str>) -> Result<()> {
    let reconciler = Reconciler::new(settings)?;
    let dirs: Vec<String> = reconciler
        .load_live()
        .content_dirs()
        .iter()
        .map(|d| d.display().to_string())
        .collect();

    let mut stdout = std::io::stdout().lock();
    match separator {
        Some(separator) => writeln!(stdout, "{}", dirs.join(separator))?,
        None => {
            for dir in &dirs {
                writeln!(stdout, "{}", dir)?;
            }
        }
    }

    Ok(())
}
