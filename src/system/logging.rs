//! Logging system initialization

use std::path::Path;

use anyhow::{Context, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stdout,
    RollingFile { dir: &'a Path, prefix: &'a str },
    File(&'a Path),
}

/// Decide the log target from configuration. An empty file name means stdout.
pub fn log_target(config: &LoggingConfig) -> LogTarget<'_> {
    match config.file.as_deref() {
        Some(file) if !file.is_empty() => {
            let path = Path::new(file);
            if config.enable_rotation {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                let prefix = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("tinylink.log")
                    .trim_end_matches(".log");
                LogTarget::RollingFile { dir, prefix }
            } else {
                LogTarget::File(path)
            }
        }
        _ => LogTarget::Stdout,
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `logging.level`. The returned guard must be kept alive
/// until shutdown so buffered lines get flushed.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<WorkerGuard> {
    let target = log_target(config);
    let writer: Box<dyn std::io::Write + Send + Sync> = match &target {
        LogTarget::Stdout => Box::new(std::io::stdout()),
        LogTarget::RollingFile { dir, prefix } => Box::new(
            rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(*prefix)
                .filename_suffix("log")
                .max_log_files(config.max_backups.max(1) as usize)
                .build(dir)
                .with_context(|| format!("Failed to create rolling log appender in {:?}", dir))?,
        ),
        LogTarget::File(path) => Box::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?,
        ),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(target == LogTarget::Stdout);

    let installed = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}
