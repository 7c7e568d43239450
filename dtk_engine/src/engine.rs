//! Token engine
//!
//! Entry point for embedding code: owns a function catalog and the engine
//! configuration, and resolves single values or whole trees.

use crate::catalog::{CatalogError, FunctionCatalog, FunctionContext, FunctionFamily, FunctionInfo, FunctionResult};
use crate::processor::ExpressionProcessor;
use crate::report::ResolutionReport;
use crate::walker::{TreeWalker, WalkStats};
use dtk_core::config::{ConfigError, EngineConfig};
use dtk_core::logging::{codes, DiagnosticCollector};
use dtk_core::tree::{TokenTree, TreeError};
use dtk_core::{log_debug, log_success};
use serde_json::Value;
use std::time::Instant;

/// Resolves design token expressions against token trees
#[derive(Debug, Clone)]
pub struct TokenEngine {
    catalog: FunctionCatalog,
    context: FunctionContext,
}

impl Default for TokenEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEngine {
    /// Engine with every built-in function and the default configuration.
    ///
    /// Invalid `DTK_*` overrides fall back to the built-in settings.
    pub fn new() -> Self {
        Self {
            catalog: FunctionCatalog::with_builtins(),
            context: FunctionContext::default(),
        }
    }

    /// Engine with every built-in function and a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            catalog: FunctionCatalog::with_builtins(),
            context: FunctionContext::new(config),
        })
    }

    /// Engine over an explicitly built catalog
    pub fn with_catalog(catalog: FunctionCatalog, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            catalog,
            context: FunctionContext::new(config),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        self.context.config()
    }

    pub fn catalog(&self) -> &FunctionCatalog {
        &self.catalog
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
        self.catalog
            .register(name, family, signature, description, function)?;
        log_success!(codes::success::FUNCTION_REGISTERED, "Function registered",
            "name" => name,
            "family" => family
        );
        Ok(())
    }

    /// Remove a function; returns whether it existed
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.catalog.unregister(name);
        log_debug!("Function unregistered", "name" => name, "existed" => removed);
        removed
    }

    /// Catalog listing, sorted by family then name
    pub fn list_functions(&self) -> Vec<FunctionInfo> {
        self.catalog.list_functions()
    }

    /// Resolve one ad-hoc value against `tree`
    pub fn resolve_one(&self, value: &Value, tree: &TokenTree) -> Value {
        self.resolve_one_with_report(value, tree).0
    }

    pub fn resolve_one_with_report(
        &self,
        value: &Value,
        tree: &TokenTree,
    ) -> (Value, ResolutionReport) {
        let mut collector = DiagnosticCollector::new();
        let processor = ExpressionProcessor::new(&self.catalog, &self.context, tree);
        let resolved = processor.process(value, &mut collector);

        let stats = WalkStats {
            visited: 1,
            changed: usize::from(&resolved != value),
            unresolved: usize::from(collector.has_warnings()),
        };
        log_success!(codes::success::REFERENCE_RESOLUTION_COMPLETE, "Value resolved",
            "warnings" => stats.unresolved
        );

        (resolved, ResolutionReport::new(stats, collector))
    }

    /// Resolve every token in `tree` into a new tree
    pub fn resolve_all(&self, tree: &TokenTree) -> TokenTree {
        self.resolve_all_with_report(tree).0
    }

    pub fn resolve_all_with_report(&self, tree: &TokenTree) -> (TokenTree, ResolutionReport) {
        let started = Instant::now();
        let mut collector = DiagnosticCollector::new();
        let processor = ExpressionProcessor::new(&self.catalog, &self.context, tree);
        let mut walker = TreeWalker::new(processor);
        let resolved = walker.walk(tree, &mut collector);
        let stats = walker.stats();

        log_success!(codes::success::TREE_RESOLUTION_COMPLETE, "Token tree resolved",
            "tokens" => stats.visited,
            "changed" => stats.changed,
            "unresolved" => stats.unresolved,
            "duration_ms" => started.elapsed().as_millis()
        );

        (resolved, ResolutionReport::new(stats, collector))
    }

    /// Resolve a JSON document; fails only when the root is not an object
    pub fn resolve_json(&self, document: &Value) -> Result<(Value, ResolutionReport), TreeError> {
        let tree = TokenTree::from_json(document)?;
        let (resolved, report) = self.resolve_all_with_report(&tree);
        Ok((resolved.to_json(), report))
    }
}
