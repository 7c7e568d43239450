// RUNTIME SETTINGS

use super::constants::compile_time::{formatting, units, viewport};
use crate::log_warning;
use crate::logging::codes;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Engine configuration consumed by the function catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root font size in px for rem/em conversion
    pub base_font_size: f64,

    /// Decimal digits kept when formatting dimensions
    pub precision: u32,

    /// Lower viewport bound (px) for fluid typography
    pub min_viewport: f64,

    /// Upper viewport bound (px) for fluid typography
    pub max_viewport: f64,

    /// Ratio name or number used when a scale function gets none
    pub default_ratio: String,

    /// CSS functions left for the browser when the catalog lacks them or rejects the arguments
    pub css_passthrough: Vec<String>,
}

impl Default for EngineConfig {
    /// Built-in settings with `DTK_*` environment overrides. Overrides that fail
    /// validation are dropped as a whole.
    fn default() -> Self {
        let builtin = Self::builtin();
        let config = Self {
            base_font_size: env_or("DTK_BASE_FONT_SIZE", builtin.base_font_size),
            precision: env_or("DTK_PRECISION", builtin.precision),
            min_viewport: env_or("DTK_MIN_VIEWPORT", builtin.min_viewport),
            max_viewport: env_or("DTK_MAX_VIEWPORT", builtin.max_viewport),
            default_ratio: env::var("DTK_DEFAULT_RATIO")
                .unwrap_or_else(|_| builtin.default_ratio.clone()),
            css_passthrough: builtin.css_passthrough.clone(),
        };

        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log_warning!(codes::config::ENVIRONMENT_IGNORED, "Ignoring DTK_* environment overrides",
                    "reason" => e
                );
                builtin
            }
        }
    }
}

impl EngineConfig {
    /// Settings from the compile-time constants alone
    pub fn builtin() -> Self {
        Self {
            base_font_size: units::BASE_FONT_SIZE_PX,
            precision: formatting::DEFAULT_PRECISION,
            min_viewport: viewport::DEFAULT_MIN_VIEWPORT_PX,
            max_viewport: viewport::DEFAULT_MAX_VIEWPORT_PX,
            default_ratio: "majorThird".to_string(),
            css_passthrough: [
                "rgb",
                "rgba",
                "hsl",
                "hsla",
                "hwb",
                "lab",
                "lch",
                "oklab",
                "oklch",
                "color",
                "color-mix",
                "calc",
                "clamp",
                "min",
                "max",
                "var",
                "env",
                "url",
                "linear-gradient",
                "radial-gradient",
                "conic-gradient",
                "cubic-bezier",
                "steps",
                "translate",
                "rotate",
                "scale",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// Parse configuration from TOML text; missing fields take defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject values the catalog cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_font_size.is_finite() && self.base_font_size > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "base_font_size",
                reason: format!("must be a positive number, got {}", self.base_font_size),
            });
        }

        if self.precision > formatting::MAX_PRECISION {
            return Err(ConfigError::InvalidValue {
                field: "precision",
                reason: format!(
                    "must be at most {}, got {}",
                    formatting::MAX_PRECISION,
                    self.precision
                ),
            });
        }

        if !(self.min_viewport.is_finite() && self.min_viewport >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "min_viewport",
                reason: format!("must be a non-negative number, got {}", self.min_viewport),
            });
        }

        if !(self.max_viewport.is_finite() && self.max_viewport > self.min_viewport) {
            return Err(ConfigError::InvalidValue {
                field: "max_viewport",
                reason: format!(
                    "must be greater than min_viewport ({}), got {}",
                    self.min_viewport, self.max_viewport
                ),
            });
        }

        Ok(())
    }

    pub fn is_css_passthrough(&self, name: &str) -> bool {
        self.css_passthrough
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(name))
    }
}
