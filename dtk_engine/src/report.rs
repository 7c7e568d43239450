//! Resolution reports
//!
//! A report pairs the diagnostics of one resolution with its counters, so callers can
//! inspect warnings without touching the global logger.

use crate::walker::WalkStats;
use chrono::{DateTime, Utc};
use dtk_core::logging::{format_cargo_style, DiagnosticCollector, EventSummary, LogEvent};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct ResolutionReport {
    pub generated_at: DateTime<Utc>,
    pub stats: WalkStats,
    diagnostics: DiagnosticCollector,
}

impl ResolutionReport {
    pub fn new(stats: WalkStats, diagnostics: DiagnosticCollector) -> Self {
        Self {
            generated_at: Utc::now(),
            stats,
            diagnostics,
        }
    }

    pub fn events(&self) -> &[LogEvent] {
        self.diagnostics.events()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEvent> {
        self.diagnostics.warnings()
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.has_warnings()
    }

    pub fn summary(&self) -> EventSummary {
        self.diagnostics.summary()
    }

    /// Events with the given code, e.g. `"W110"`
    pub fn events_with_code(&self, code: &str) -> Vec<&LogEvent> {
        self.events()
            .iter()
            .filter(|e| e.code.as_str() == code)
            .collect()
    }

    pub fn diagnostics(&self) -> &DiagnosticCollector {
        &self.diagnostics
    }

    /// Human readable warnings, grouped by token
    pub fn format_text(&self) -> String {
        format_cargo_style(&self.diagnostics)
    }

    /// Every warning and error with its category, severity and recommended action
    pub fn format_detailed(&self) -> String {
        self.events()
            .iter()
            .filter(|e| e.is_warning() || e.is_error())
            .map(|e| format!("{}\n", e.format_detailed()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> Value {
        let summary = self.summary();
        json!({
            "generated_at": self.generated_at.to_rfc3339(),
            "tokens": {
                "visited": self.stats.visited,
                "changed": self.stats.changed,
                "unresolved": self.stats.unresolved,
            },
            "summary": {
                "warnings": self.diagnostics.warning_count(),
                "errors": summary.error_count,
                "dropped": self.diagnostics.dropped(),
            },
            "events": self.events().iter().map(LogEvent::to_json).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtk_core::logging::codes;

    #[test]
    fn test_report_json_shape() {
        let mut collector = DiagnosticCollector::silent();
        collector.enter_token("color.bad");
        collector.record(
            LogEvent::warning_with_code(codes::references::UNRESOLVED_REFERENCE, "missing")
                .with_context("reference", "color.nope"),
        );
        collector.leave_token();

        let report = ResolutionReport::new(
            WalkStats {
                visited: 3,
                changed: 1,
                unresolved: 1,
            },
            collector,
        );

        let json = report.to_json();
        assert_eq!(json["tokens"]["visited"], 3);
        assert_eq!(json["summary"]["warnings"], 1);
        assert_eq!(json["events"][0]["code"], "W110");
        assert!(json["generated_at"].as_str().unwrap().contains('T'));
        assert_eq!(report.events_with_code("W110").len(), 1);
        assert!(report.format_text().contains("--> color.bad"));

        let detailed = report.format_detailed();
        assert!(detailed.starts_with("[WARN] W110 - missing at color.bad"));
        assert!(detailed.contains("Category: References"));
        assert!(detailed.contains("Recommended action: Check the dot-path spelling"));
        assert!(detailed.contains("reference: color.nope"));
    }
}
