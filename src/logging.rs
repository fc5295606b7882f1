use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};
use log::info;

/// Starts logging to stderr. Keep the returned handle alive for the life of the process.
pub fn init_logging(level: &str) -> Result<LoggerHandle> {
    let level = normalize_level(level);
    let handle = Logger::try_with_env_or_str(level)
        .with_context(|| format!("invalid log specification `{level}`"))?
        .log_to_stderr()
        .format(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    info!(
        "stemma {} starting on {} ({} build)",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        build_mode()
    );
    Ok(handle)
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "info" }
}

fn normalize_level(level: &str) -> &str {
    let level = level.trim();
    if level.is_empty() { default_log_level() } else { level }
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "release" }
}
