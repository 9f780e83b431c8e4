//! Tracing subscriber setup.

use std::fs;

use anyhow::{Context, Result};
use medbook_core::config::{Config, paths};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_ENV: &str = "MEDBOOK_LOG";
const DEFAULT_LEVEL: &str = "warn";
const LOG_FILE_NAME: &str = "medbook.log";

/// Installs the global subscriber.
///
/// Filter precedence: `MEDBOOK_LOG`, then `log_level` from config, then
/// `warn`. Output goes to stderr; with `log_file = true` it is also
/// appended to `<home>/logs/medbook.log`. Keep the returned guard alive
/// until exit so buffered file output is flushed.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => {
            let level = config
                .log_level
                .as_deref()
                .map(str::trim)
                .filter(|level| !level.is_empty())
                .unwrap_or(DEFAULT_LEVEL);
            EnvFilter::try_new(level).with_context(|| format!("invalid log_level '{level}'"))?
        }
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = if config.log_file {
        let dir = paths::logs_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("create log directory {}", dir.display()))?;
        let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;

    Ok(guard)
}
