//! Logging configuration: console plus a daily-rolling file under `logs/`

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{
    self,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::LoggingConfig;
use crate::RagChatError;
use crate::Result;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "ragchat.log";

/// Filter directive for a level; `RUST_LOG` wins when set
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,ragchat={level},tower_http={level}")))
}

/// Initialize logging from configuration
///
/// `verbose` raises the crate level to `debug`. The returned guard flushes the
/// file writer on drop; keep it alive for the life of the process.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<WorkerGuard> {
    let level = if verbose { "debug" } else { config.level.as_str() };

    if config.backtrace && std::env::var_os("RUST_BACKTRACE").is_none() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let logs_dir = Path::new(LOG_DIR);
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    let file_appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking)
        .with_ansi(false); // No colors in file

    Registry::default()
        .with(env_filter(level))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| RagChatError::Config(format!("logging already initialized: {e}")))?;

    tracing::debug!("Logging initialized with level: {}", level);
    tracing::debug!("Log files will be saved to: {}/{}.YYYY-MM-DD", LOG_DIR, LOG_FILE);

    Ok(guard)
}
