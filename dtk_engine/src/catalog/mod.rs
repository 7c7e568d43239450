//! Function catalog
//!
//! Name to implementation registry for the expression language. Catalogs are
//! plain values: the engine owns one, tests build their own.

pub mod errors;

pub use errors::{CatalogError, FunctionError, FunctionResult};

use dtk_core::config::EngineConfig;
use dtk_core::parser::format_dimension;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::SystemTime;

/// Settings visible to catalog functions
#[derive(Debug, Clone, Default)]
pub struct FunctionContext {
    config: EngineConfig,
}

impl FunctionContext {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn base_font_size(&self) -> f64 {
        self.config.base_font_size
    }

    pub fn precision(&self) -> u32 {
        self.config.precision
    }

    pub fn min_viewport(&self) -> f64 {
        self.config.min_viewport
    }

    pub fn max_viewport(&self) -> f64 {
        self.config.max_viewport
    }

    pub fn default_ratio(&self) -> &str {
        &self.config.default_ratio
    }

    /// Format a dimension with the configured precision
    pub fn format(&self, value: f64, unit: &str) -> String {
        format_dimension(value, unit, self.config.precision)
    }
}

/// A catalog function: resolved string arguments in, literal string out
pub type TokenFunction =
    Arc<dyn Fn(&[String], &FunctionContext) -> FunctionResult + Send + Sync + 'static>;

/// Function family, used for documentation listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionFamily {
    Color,
    Contrast,
    Typography,
    Math,
    Custom,
}

impl FunctionFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionFamily::Color => "color",
            FunctionFamily::Contrast => "contrast",
            FunctionFamily::Typography => "typography",
            FunctionFamily::Math => "math",
            FunctionFamily::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "color" | "colour" => Some(FunctionFamily::Color),
            "contrast" | "accessibility" => Some(FunctionFamily::Contrast),
            "typography" | "type" => Some(FunctionFamily::Typography),
            "math" => Some(FunctionFamily::Math),
            "custom" => Some(FunctionFamily::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for FunctionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Documentation record for a registered function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub family: FunctionFamily,
    pub signature: String,
    pub description: String,
}

#[derive(Clone)]
struct CatalogEntry {
    info: FunctionInfo,
    function: TokenFunction,
}

#[derive(Debug, Clone)]
pub struct CatalogMetadata {
    pub creation_time: SystemTime,
    pub last_registration: Option<SystemTime>,
    pub registrations: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStatistics {
    pub total_functions: usize,
    pub by_family: Vec<(FunctionFamily, usize)>,
}

fn function_name_regex() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("function name pattern is valid")
    })
}

/// Registry of invokable functions
#[derive(Clone)]
pub struct FunctionCatalog {
    functions: HashMap<String, CatalogEntry>,
    metadata: CatalogMetadata,
}

impl Default for FunctionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionCatalog")
            .field("functions", &self.functions.len())
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl FunctionCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            metadata: CatalogMetadata {
                creation_time: SystemTime::now(),
                last_registration: None,
                registrations: 0,
            },
        }
    }

    /// Catalog holding every built-in function family
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        crate::functions::register_builtins(&mut catalog);
        catalog
    }

    /// Add or overwrite a function
    pub fn register<F>(
        &mut self,
        name: &str,
        family: FunctionFamily,
        signature: &str,
        description: &str,
        function: F,
    ) -> Result<(), CatalogError>
    where
        F: Fn(&[String], &FunctionContext) -> FunctionResult + Send + Sync + 'static,
    {
        if !function_name_regex().is_match(name) {
            return Err(CatalogError::InvalidName(name.to_string()));
        }

        if !signature.starts_with(&format!("{}(", name)) {
            return Err(CatalogError::SignatureMismatch {
                name: name.to_string(),
                signature: signature.to_string(),
            });
        }

        self.insert(name, family, signature, description, Arc::new(function));
        Ok(())
    }

    /// Registration path for built-ins, whose names are known to be valid
    pub(crate) fn insert(
        &mut self,
        name: &str,
        family: FunctionFamily,
        signature: &str,
        description: &str,
        function: TokenFunction,
    ) {
        let info = FunctionInfo {
            name: name.to_string(),
            family,
            signature: signature.to_string(),
            description: description.to_string(),
        };

        self.functions
            .insert(name.to_string(), CatalogEntry { info, function });
        self.metadata.registrations += 1;
        self.metadata.last_registration = Some(SystemTime::now());
    }

    /// Remove a function; returns whether it was registered
    pub fn unregister(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&TokenFunction> {
        self.functions.get(name).map(|entry| &entry.function)
    }

    pub fn info(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.get(name).map(|entry| &entry.info)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Invoke a function by name; `None` when it is not registered
    pub fn call(
        &self,
        name: &str,
        args: &[String],
        context: &FunctionContext,
    ) -> Option<FunctionResult> {
        self.get(name).map(|function| function(args, context))
    }

    /// Every function, sorted by family then name
    pub fn list_functions(&self) -> Vec<FunctionInfo> {
        let mut infos: Vec<FunctionInfo> =
            self.functions.values().map(|e| e.info.clone()).collect();
        infos.sort_by(|a, b| a.family.cmp(&b.family).then_with(|| a.name.cmp(&b.name)));
        infos
    }

    pub fn list_family(&self, family: FunctionFamily) -> Vec<FunctionInfo> {
        self.list_functions()
            .into_iter()
            .filter(|info| info.family == family)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    pub fn get_statistics(&self) -> CatalogStatistics {
        let mut counts: HashMap<FunctionFamily, usize> = HashMap::new();
        for entry in self.functions.values() {
            *counts.entry(entry.info.family).or_default() += 1;
        }
        let mut by_family: Vec<(FunctionFamily, usize)> = counts.into_iter().collect();
        by_family.sort();

        CatalogStatistics {
            total_functions: self.functions.len(),
            by_family,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn shout(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
        Ok(args.join(" ").to_uppercase())
    }

    #[test]
    fn test_register_call_unregister() {
        let mut catalog = FunctionCatalog::new();
        catalog
            .register(
                "shout",
                FunctionFamily::Custom,
                "shout(text)",
                "Uppercases text",
                shout,
            )
            .unwrap();

        let ctx = FunctionContext::default();
        assert_eq!(
            catalog.call("shout", &["hi".to_string()], &ctx),
            Some(Ok("HI".to_string()))
        );
        assert!(catalog.unregister("shout"));
        assert!(!catalog.unregister("shout"));
        assert_eq!(catalog.call("shout", &[], &ctx), None);
    }

    #[test]
    fn test_register_overwrites() {
        let mut catalog = FunctionCatalog::with_builtins();
        let before = catalog.len();
        catalog
            .register("tint", FunctionFamily::Custom, "tint(x)", "Replaced", |_, _| {
                Ok("replaced".to_string())
            })
            .unwrap();

        assert_eq!(catalog.len(), before);
        assert_eq!(catalog.info("tint").map(|i| i.family), Some(FunctionFamily::Custom));
    }

    #[test]
    fn test_invalid_registrations() {
        let mut catalog = FunctionCatalog::new();
        assert_matches!(
            catalog.register("bad name", FunctionFamily::Custom, "bad name()", "", shout),
            Err(CatalogError::InvalidName(_))
        );
        assert_matches!(
            catalog.register("good", FunctionFamily::Custom, "other(x)", "", shout),
            Err(CatalogError::SignatureMismatch { .. })
        );
    }

    #[test]
    fn test_builtin_listing_covers_every_family() {
        let catalog = FunctionCatalog::with_builtins();
        let stats = catalog.get_statistics();
        assert_eq!(stats.total_functions, catalog.len());

        for family in [
            FunctionFamily::Color,
            FunctionFamily::Contrast,
            FunctionFamily::Typography,
            FunctionFamily::Math,
        ] {
            assert!(!catalog.list_family(family).is_empty(), "{} is empty", family);
        }

        let listing = catalog.list_functions();
        assert_eq!(listing.first().map(|i| i.family), Some(FunctionFamily::Color));
        assert!(listing.iter().all(|i| i.signature.starts_with(&i.name)));
    }

    #[test]
    fn test_family_parse() {
        assert_eq!(FunctionFamily::parse("Typography"), Some(FunctionFamily::Typography));
        assert_eq!(FunctionFamily::parse("a11y"), None);
    }
}
