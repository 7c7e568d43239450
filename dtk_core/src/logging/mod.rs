//! Global logging module for the token engine
//!
//! Provides coded diagnostics, a thread-safe global logging service and a clean
//! macro interface. Nothing is printed until a host calls [`init_global_logging`];
//! per-resolution diagnostics are always available through [`DiagnosticCollector`].

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use collector::{format_cargo_style, DiagnosticCollector};
pub use events::{LogEvent, LogLevel};
pub use service::{EventSummary, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Install the global service (first call wins)
pub fn init_global_logging(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether debug events would reach any logger
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Attach context pairs and hand the event to the global logger (used by macros)
pub fn log_with_context(event: LogEvent, context: Vec<(&str, String)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    let event = context
        .into_iter()
        .fold(event, |event, (key, value)| event.with_context(key, &value));

    logger.log_event(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_with_context_without_logger() {
        // Must not panic when nothing is installed
        log_with_context(
            LogEvent::warning_with_code(codes::functions::UNKNOWN_FUNCTION, "unknown"),
            vec![("name", "bogus".to_string())],
        );
    }
}
