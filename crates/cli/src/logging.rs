use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tracksync_core::LoggingConfig;

/// Name of the per-run log file, stamped with the local start time.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("LOG-{}.txt", started.format("%Y%m%d-%H%M%S"))
}

/// Install the console and per-run file subscribers.
///
/// The returned guard flushes the file writer when dropped, so it must
/// outlive the run.
pub fn init_logging(config: &LoggingConfig) -> Result<(WorkerGuard, PathBuf)> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .with_context(|| format!("Invalid log filter {:?}", config.filter))?;

    std::fs::create_dir_all(&config.directory).with_context(|| {
        format!("Failed to create log directory {:?}", config.directory)
    })?;

    let file_name = log_file_name(Local::now());
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&file_name)
        .build(&config.directory)
        .with_context(|| format!("Failed to open log file in {:?}", config.directory))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok((guard, config.directory.join(file_name)))
}
