//! tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with
//! `--debug`. With a log file, output is appended there without colour.

use crate::error::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "debug" } else { "info" })
    })
}

/// Install the global subscriber.
///
/// A second call is a no-op, so tests and embedders can call it freely.
pub fn init(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter(debug));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
    Ok(())
}
