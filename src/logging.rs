use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming a log file when `--log-file` is not given.
pub const LOG_ENV: &str = "MOVIE_BROWSER_LOG";

/// Install a file-backed subscriber if a log file was requested.
///
/// The terminal belongs to the UI, so nothing is logged unless `--log-file`
/// or `MOVIE_BROWSER_LOG` points somewhere. `RUST_LOG` overrides the
/// default `info` filter.
pub fn init_tracing(log_file: Option<&Path>) {
    let Some(path) = log_file
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(LOG_ENV).map(PathBuf::from))
    else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: failed to open log file {}: {}", path.display(), e);
            return;
        }
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}
