//! Per-resolution diagnostic collector
//!
//! Every top-level resolution owns one collector. Events are kept for the caller's
//! report and forwarded to the global logging service when one is installed.

use super::codes::Code;
use super::config;
use super::events::LogEvent;
use super::service::EventSummary;
use std::collections::{BTreeMap, HashMap};

/// Collects diagnostics raised while resolving a value or a whole tree
#[derive(Debug, Default, Clone)]
pub struct DiagnosticCollector {
    events: Vec<LogEvent>,
    current_path: Option<String>,
    dropped: usize,
    warning_count: usize,
    code_counts: HashMap<Code, usize>,
    forward_to_global: bool,
}

impl DiagnosticCollector {
    /// Collector that also forwards every event to the global logger
    pub fn new() -> Self {
        Self {
            forward_to_global: true,
            ..Self::default()
        }
    }

    /// Collector that keeps events to itself (tests, embedding hosts)
    pub fn silent() -> Self {
        Self::default()
    }

    /// Set the token path attached to subsequent events
    pub fn enter_token(&mut self, path: &str) {
        self.current_path = Some(path.to_string());
    }

    pub fn leave_token(&mut self) {
        self.current_path = None;
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    /// Record an event, tagging it with the current token path.
    ///
    /// An event identical to one already kept (code, message, token and context) is
    /// only counted under its code. Counters keep growing after the retention limit
    /// is reached.
    pub fn record(&mut self, event: LogEvent) {
        let event = match (&event.token_path, &self.current_path) {
            (None, Some(path)) => event.with_token_path(path),
            _ => event,
        };

        *self.code_counts.entry(event.code).or_insert(0) += 1;
        if self.events.iter().any(|kept| Self::same_diagnostic(kept, &event)) {
            return;
        }

        if event.is_warning() {
            self.warning_count += 1;
        }

        if self.forward_to_global {
            if let Some(logger) = super::try_get_global_logger() {
                logger.log_event(event.clone());
            }
        }

        if self.events.len() < config::get_max_diagnostics() {
            self.events.push(event);
        } else {
            self.dropped += 1;
        }
    }

    fn same_diagnostic(a: &LogEvent, b: &LogEvent) -> bool {
        a.code == b.code
            && a.message == b.message
            && a.token_path == b.token_path
            && a.context == b.context
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Distinct warnings recorded so far, including ones past the retention limit
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Times an event with `code` was raised, duplicates included
    pub fn count(&self, code: Code) -> usize {
        self.code_counts.get(&code).copied().unwrap_or(0)
    }

    /// Number of events discarded after the retention limit was reached
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEvent> {
        self.events.iter().filter(|e| e.is_warning())
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary::from_events(&self.events)
    }

    /// Events grouped by token path; events raised outside a token go under `<value>`
    pub fn by_token(&self) -> BTreeMap<String, Vec<&LogEvent>> {
        let mut grouped: BTreeMap<String, Vec<&LogEvent>> = BTreeMap::new();
        for event in &self.events {
            let key = event
                .token_path
                .clone()
                .unwrap_or_else(|| "<value>".to_string());
            grouped.entry(key).or_default().push(event);
        }
        grouped
    }
}

/// Format collected warnings in a cargo-like layout, grouped by token
pub fn format_cargo_style(collector: &DiagnosticCollector) -> String {
    let mut output = String::new();

    for (path, events) in collector.by_token() {
        for event in events.iter().filter(|e| e.is_warning() || e.is_error()) {
            let label = if event.is_error() { "error" } else { "warning" };
            output.push_str(&format!("{}[{}]: {}\n", label, event.code, event.message));
            output.push_str(&format!("  --> {}\n", path));
            for (key, value) in &event.context {
                output.push_str(&format!("   = {}: {}\n", key, value));
            }
            output.push('\n');
        }
    }

    let summary = collector.summary();
    if summary.warning_count > 0 || summary.error_count > 0 {
        output.push_str(&format!(
            "resolution finished with {} warning(s), {} error(s)",
            summary.warning_count, summary.error_count
        ));
        if collector.dropped() > 0 {
            output.push_str(&format!(" ({} more not shown)", collector.dropped()));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_events_tagged_with_current_token() {
        let mut collector = DiagnosticCollector::silent();
        collector.enter_token("color.primary");
        collector.record(LogEvent::warning_with_code(
            codes::references::UNRESOLVED_REFERENCE,
            "missing",
        ));
        collector.leave_token();
        collector.record(LogEvent::warning_with_code(
            codes::functions::UNKNOWN_FUNCTION,
            "unknown",
        ));

        let events = collector.events();
        assert_eq!(events[0].token_path.as_deref(), Some("color.primary"));
        assert_eq!(events[1].token_path, None);
        assert_eq!(collector.by_token().len(), 2);
    }

    #[test]
    fn test_cargo_style_output() {
        let mut collector = DiagnosticCollector::silent();
        collector.enter_token("size.bad");
        collector.record(
            LogEvent::warning_with_code(codes::functions::FUNCTION_FAILED, "division by zero")
                .with_context("call", "divide(1rem, 0)"),
        );

        let output = format_cargo_style(&collector);
        assert!(output.contains("warning[W202]: division by zero"));
        assert!(output.contains("--> size.bad"));
        assert!(output.contains("call: divide(1rem, 0)"));
        assert!(output.contains("1 warning(s)"));
    }

    #[test]
    fn test_identical_events_recorded_once() {
        let mut collector = DiagnosticCollector::silent();
        collector.enter_token("color.ring");
        for _ in 0..3 {
            collector.record(
                LogEvent::warning_with_code(codes::functions::FUNCTION_FAILED, "shade failed")
                    .with_context("call", "shade(nope, 20%)"),
            );
        }
        collector.record(
            LogEvent::warning_with_code(codes::functions::FUNCTION_FAILED, "tint failed")
                .with_context("call", "tint(shade(nope, 20%), 50%)"),
        );

        assert_eq!(collector.events().len(), 2);
        assert_eq!(collector.warning_count(), 2);
        assert_eq!(collector.count(codes::functions::FUNCTION_FAILED), 4);
    }

    #[test]
    fn test_counters_survive_retention_limit() {
        let mut collector = DiagnosticCollector::silent();
        let total = config::get_max_diagnostics() + 25;
        for i in 0..total {
            collector.enter_token(&format!("size.s{}", i));
            collector.record(LogEvent::warning_with_code(
                codes::references::UNRESOLVED_REFERENCE,
                "missing",
            ));
        }

        assert_eq!(collector.events().len(), config::get_max_diagnostics());
        assert_eq!(collector.dropped(), 25);
        assert_eq!(collector.warning_count(), total);
        assert_eq!(collector.count(codes::references::UNRESOLVED_REFERENCE), total);
        assert_eq!(collector.count(codes::references::REFERENCE_CYCLE), 0);
    }

    #[test]
    fn test_empty_collector_prints_nothing() {
        let collector = DiagnosticCollector::silent();
        assert!(format_cargo_style(&collector).is_empty());
        assert!(!collector.has_warnings());
    }
}
