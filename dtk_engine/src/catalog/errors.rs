//! Error types for the function catalog
//!
//! `FunctionError` is what a catalog function returns when it cannot produce a
//! value. The processor turns these into diagnostics; they never abort resolution.

/// Faults raised by catalog functions
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FunctionError {
    #[error("missing required argument '{name}' (position {position})")]
    MissingArgument { name: &'static str, position: usize },

    #[error("expected at most {max} argument(s), got {found}")]
    TooManyArguments { max: usize, found: usize },

    #[error("'{0}' is not a recognized color")]
    InvalidColor(String),

    #[error("'{0}' is not a valid dimension")]
    InvalidDimension(String),

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("invalid value for '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("incompatible units: '{left}' and '{right}'")]
    IncompatibleUnits { left: String, right: String },

    #[error("division by zero in {operation}")]
    DivisionByZero { operation: &'static str },

    #[error("unknown scale ratio '{0}'")]
    UnknownRatio(String),

    #[error("unknown scale step '{0}'")]
    UnknownStep(String),
}

impl FunctionError {
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub fn incompatible_units(left: &str, right: &str) -> Self {
        Self::IncompatibleUnits {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn division_by_zero(operation: &'static str) -> Self {
        Self::DivisionByZero { operation }
    }
}

/// Errors raised while changing the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("'{0}' is not a valid function name (expected an identifier such as 'myTint')")]
    InvalidName(String),

    #[error("function signature for '{name}' must start with '{name}(': got '{signature}'")]
    SignatureMismatch { name: String, signature: String },
}

pub type FunctionResult = Result<String, FunctionError>;
