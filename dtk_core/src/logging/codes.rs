//! Consolidated diagnostic codes and classification system
//!
//! Single source of truth for all diagnostic codes, their metadata, and classification functions.
//! This module combines code constants with their behavioral metadata in one place.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }
}

/// Complete metadata for a diagnostic code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// DIAGNOSTIC CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Configuration error codes
pub mod config {
    use super::Code;

    pub const INVALID_CONFIGURATION: Code = Code::new("E010");
    pub const CONFIG_IO_ERROR: Code = Code::new("E011");
    pub const ENVIRONMENT_IGNORED: Code = Code::new("W012");
}

/// Token tree error codes
pub mod tree {
    use super::Code;

    pub const NOT_A_TREE: Code = Code::new("E020");
    pub const INVALID_TOKEN: Code = Code::new("W021");
}

/// Reference resolution codes
pub mod references {
    use super::Code;

    pub const UNRESOLVED_REFERENCE: Code = Code::new("W110");
    pub const REFERENCE_TO_GROUP: Code = Code::new("W111");
    pub const REFERENCE_CYCLE: Code = Code::new("W140");
}

/// Function evaluation codes
pub mod functions {
    use super::Code;

    pub const UNKNOWN_FUNCTION: Code = Code::new("W200");
    pub const REENTRANT_CALL: Code = Code::new("W201");
    pub const FUNCTION_FAILED: Code = Code::new("W202");
    pub const CSS_PASSTHROUGH: Code = Code::new("D203");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const CONFIGURATION_LOADED: Code = Code::new("I010");
    pub const TREE_LOADED: Code = Code::new("I020");
    pub const REFERENCE_RESOLUTION_COMPLETE: Code = Code::new("I060");
    pub const TREE_RESOLUTION_COMPLETE: Code = Code::new("I070");
    pub const FUNCTION_REGISTERED: Code = Code::new("I080");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Critical internal engine error",
                "File a bug report with the offending token tree",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                "Engine initialization failure",
                "Check logging and engine configuration",
            ),
            ErrorMetadata::new(
                "E010",
                "Configuration",
                Severity::High,
                false,
                "Engine configuration is invalid",
                "Fix the reported configuration field",
            ),
            ErrorMetadata::new(
                "E011",
                "Configuration",
                Severity::High,
                false,
                "Configuration file could not be read",
                "Check the configuration path and permissions",
            ),
            ErrorMetadata::new(
                "W012",
                "Configuration",
                Severity::Medium,
                true,
                "DTK_* environment overrides are invalid; built-in defaults used",
                "Fix or unset the DTK_* variables named in the message",
            ),
            ErrorMetadata::new(
                "E020",
                "Tree",
                Severity::High,
                false,
                "Input is not a token tree",
                "Pass a JSON object at the root of the token tree",
            ),
            ErrorMetadata::new(
                "W021",
                "Tree",
                Severity::Low,
                true,
                "Token entry has an unexpected shape",
                "Give every token a `value` or `$value` field",
            ),
            ErrorMetadata::new(
                "W110",
                "References",
                Severity::Medium,
                true,
                "Reference does not point at a defined token",
                "Check the dot-path spelling or define the missing token",
            ),
            ErrorMetadata::new(
                "W111",
                "References",
                Severity::Medium,
                true,
                "Reference points at a token group, not a token",
                "Reference a leaf token inside the group",
            ),
            ErrorMetadata::new(
                "W140",
                "References",
                Severity::High,
                true,
                "Reference cycle detected",
                "Break the cycle so that no token depends on itself",
            ),
            ErrorMetadata::new(
                "W200",
                "Functions",
                Severity::Medium,
                true,
                "Function is not registered in the catalog",
                "Check the function name or register a custom function",
            ),
            ErrorMetadata::new(
                "W201",
                "Functions",
                Severity::High,
                true,
                "Function call re-enters itself",
                "Remove the recursive call from the expression",
            ),
            ErrorMetadata::new(
                "W202",
                "Functions",
                Severity::Medium,
                true,
                "Function evaluation failed",
                "Check argument types, units and ranges",
            ),
            ErrorMetadata::new(
                "D203",
                "Functions",
                Severity::Low,
                true,
                "CSS-native function left for the browser",
                "No action required",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if the condition is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Warning codes are prefixed with `W`
pub fn is_warning_code(code: &str) -> bool {
    code.starts_with('W')
}
