use std::path::{Path, PathBuf};

use tracing_subscriber::{fmt, prelude::*, registry::Registry, EnvFilter};

pub const LOG_FILE_NAME: &str = "cric-tui.log";

pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Routes tracing output to `<log_dir>/cric-tui.log`. The terminal belongs
/// to the UI, so nothing is written to stdout. Level comes from `RUST_LOG`,
/// `info` otherwise.
pub fn init_logging(log_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);

    Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(file_appender).with_ansi(false).with_target(true))
        .try_init()?;

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(())
}
