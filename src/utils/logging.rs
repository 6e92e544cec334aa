//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the Gatherly application.

use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard owns the background writer for the file layer;
/// the caller must keep it alive for the lifetime of the process or
/// buffered log lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "gatherly.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log admission decisions with structured data
pub fn log_admission(event_id: i64, user_id: i64, action: &str, outcome: &str) {
    info!(
        event_id = event_id,
        user_id = user_id,
        action = action,
        outcome = outcome,
        "Admission decision"
    );
}

/// Log an admission update that failed with no matching specific cause.
/// These should be rare and warrant investigation.
pub fn log_admission_anomaly(event_id: i64, user_id: i64, action: &str) {
    error!(
        event_id = event_id,
        user_id = user_id,
        action = action,
        "Atomic admission update rejected with no diagnosable cause"
    );
}

/// Log event management actions
pub fn log_event_action(event_id: i64, action: &str, user_id: i64) {
    info!(
        event_id = event_id,
        action = action,
        user_id = user_id,
        "Event action performed"
    );
}

/// Log rejected ownership checks
pub fn log_ownership_rejection(event_id: i64, user_id: i64, action: &str) {
    warn!(
        event_id = event_id,
        user_id = user_id,
        action = action,
        "Non-creator attempted a protected event mutation"
    );
}
