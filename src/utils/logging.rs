//! Logging configuration and setup
//!
//! This module provides tracing initialization based on the application
//! configuration: stdout always, plus a daily-rolling file layer when a
//! log directory is configured.

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// Returns the file writer guard, which the caller must keep alive for the
/// lifetime of the process; dropping it stops the background log writer.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::new(&config.level);
    let stdout_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    let mut guard = None;
    let file_layer = config.directory.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "gatherly.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(appender);
        guard = Some(worker_guard);
        tracing_subscriber::fmt::layer().json().with_writer(non_blocking)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}
