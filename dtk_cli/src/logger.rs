//! Bridge from the engine's coded diagnostics into the `log` facade

use dtk_core::logging::{self, LogEvent, LogLevel, Logger, LoggingService, StructuredLogger};
use std::sync::Arc;

/// Forwards every engine event to `log`, so `env_logger` filtering applies
pub struct LogFacadeLogger;

impl LogFacadeLogger {
    fn level(level: LogLevel) -> log::Level {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

impl Logger for LogFacadeLogger {
    fn log(&self, event: &LogEvent) {
        let level = Self::level(event.level);
        match &event.token_path {
            Some(path) => log::log!(target: "dtk", level, "[{}] {}: {}", event.code, path, event.message),
            None => log::log!(target: "dtk", level, "[{}] {}", event.code, event.message),
        }
        for (key, value) in &event.context {
            log::log!(target: "dtk", level, "    {} = {}", key, value);
        }
    }
}

/// Where engine events go
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Plain lines through `env_logger`
    Text,
    /// One JSON object per event on stderr
    Json,
}

/// Install the global logging service.
///
/// `verbosity` 0 shows warnings, 1 info, 2 and above debug. In text mode `RUST_LOG`
/// overrides it.
pub fn init(verbosity: u8, format: LogFormat) -> Result<(), String> {
    let (filter, min_level) = match verbosity {
        0 => ("warn", LogLevel::Warning),
        1 => ("info", LogLevel::Info),
        _ => ("debug", LogLevel::Debug),
    };

    let logger: Arc<dyn Logger> = match format {
        LogFormat::Json => Arc::new(StructuredLogger::new(min_level)),
        LogFormat::Text => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
                .format_timestamp(None)
                .try_init()
                .map_err(|e| format!("Failed to install logger: {}", e))?;
            Arc::new(LogFacadeLogger)
        }
    };

    logging::init_global_logging(Arc::new(LoggingService::new(logger, min_level)))
}
