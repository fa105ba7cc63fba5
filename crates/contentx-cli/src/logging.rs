use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Initialize a tracing subscriber writing to stderr.
///
/// Uses `RUST_LOG` when set. Otherwise logs at `warn`, or `debug` for the
/// workspace crates when `verbose` is set. Stdout stays reserved for command
/// output so `--json` remains parseable.
pub fn init(verbose: bool) -> Result<()> {
    let default_directive = if verbose {
        "warn,contentx_core=debug,contentx_fs=debug,contentx=debug"
    } else {
        "warn"
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{info, warn};

    #[test]
    fn test_logging_init() {
        // We can only init once per process
        let _ = init(true);

        info!("This is an info message");
        warn!("This is a warning message");
    }
}
