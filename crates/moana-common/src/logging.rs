//! Structured logging infrastructure for Moana Bot.

use crate::MoanaError;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Log level filter used when `RUST_LOG` is not set (e.g. "info" or "moana_bot=debug").
    pub level: String,
    /// Whether to emit JSON lines on stdout.
    pub json_format: bool,
    /// Directory for the log file; `None` disables file output.
    pub directory: Option<PathBuf>,
    /// Name of the log file inside `directory`.
    pub file_name: String,
    /// Whether to include target module information.
    pub include_targets: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            directory: Some(PathBuf::from("logs")),
            file_name: "bot.log".to_string(),
            include_targets: true,
        }
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// The returned guard flushes the file writer when dropped and must be held
/// for the lifetime of the process.
pub fn init_logging(options: &LoggingOptions) -> Result<Option<WorkerGuard>, MoanaError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.level))
        .map_err(|e| MoanaError::Logging(format!("invalid log filter '{}': {e}", options.level)))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if options.json_format {
        layers.push(
            fmt::layer()
                .json()
                .with_target(options.include_targets)
                .boxed(),
        );
    } else {
        layers.push(fmt::layer().with_target(options.include_targets).boxed());
    }

    let guard = match &options.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::never(directory, &options.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(options.include_targets)
                    .with_writer(writer)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| MoanaError::Logging(e.to_string()))?;

    Ok(guard)
}
