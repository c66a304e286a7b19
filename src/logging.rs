//! Logging setup
//!
//! Stdout belongs to the protocol, so log output never goes there. By default
//! events are written to stderr; `Config::log_file` redirects them to a file.
//!
//! `RUST_LOG` takes precedence over the configured filter:
//!
//! ```bash
//! RUST_LOG=annex_remote=trace git annex copy --to myremote
//! ```

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::error::Result;

/// Install the global tracing subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed.
pub fn init_tracing(config: &Config) -> Result<bool> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let installed = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .is_ok()
        }
        None => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };

    Ok(installed)
}
