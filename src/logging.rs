//! Console + append-only file logging.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Level comes from `RUST_LOG` (default `info`).
///
/// Console output is mirrored to `log_path` without ANSI colours. If the file
/// can't be opened, logging continues on the console only and the error is
/// returned for the caller to report.
pub fn init(log_path: &Path) -> std::io::Result<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().with_target(false);

    match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(filter())
                .with(console)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
            Ok(())
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(filter())
                .with(console)
                .init();
            Err(e)
        }
    }
}
