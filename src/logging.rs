use crate::config;
use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the subscriber for the CLI.
///
/// The console gets terse warnings on stderr so the colored summary on stdout
/// stays readable; GREEKS_CONSOLE_LOG overrides the level. The daily-rotated
/// JSON file under GREEKS_LOG_DIR gets everything RUST_LOG allows (info when unset).
/// A second call keeps the subscriber that is already installed.
pub fn init_logging() -> Result<()> {
    let log_dir = config::get_log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, config::LOG_FILE_NAME);

    let console = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_filter(console_filter(&config::get_console_log_level()));

    let file = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_current_span(false)
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_FILE_LOG_LEVEL)),
        );

    let installed = tracing_subscriber::registry().with(console).with(file).try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }

    Ok(())
}

/// Console directive, falling back to the default level when it does not parse
fn console_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_CONSOLE_LOG_LEVEL))
}
