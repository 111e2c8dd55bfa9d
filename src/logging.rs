use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "srcref_showcase=info";

/// Installs the global subscriber, honoring `RUST_LOG`.
///
/// Output goes to `log_file` when given, otherwise to stderr; stdout carries
/// protocol frames. Returns false if a subscriber was already installed.
pub fn init_tracing(log_file: Option<&Path>) -> io::Result<bool> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .is_ok()
        }
        None => builder.with_writer(io::stderr).try_init().is_ok(),
    };
    Ok(installed)
}

/// Test-friendly subscriber; safe to call from every test.
pub fn init_tracing_once() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .is_ok()
}
