//! Tree walker
//!
//! Rebuilds a token tree with every token value resolved. Each token is evaluated
//! against the whole input tree, which is only read.

use crate::processor::ExpressionProcessor;
use dtk_core::logging::DiagnosticCollector;
use dtk_core::tree::{join_path, Token, TokenGroup, TokenNode, TokenTree};
use serde::Serialize;

/// Counters gathered while walking a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    /// Tokens evaluated
    pub visited: usize,
    /// Tokens whose value changed
    pub changed: usize,
    /// Tokens that raised at least one warning
    pub unresolved: usize,
}

/// Walks a tree, resolving every token through one processor
pub struct TreeWalker<'a> {
    processor: ExpressionProcessor<'a>,
    stats: WalkStats,
}

impl<'a> TreeWalker<'a> {
    pub fn new(processor: ExpressionProcessor<'a>) -> Self {
        Self {
            processor,
            stats: WalkStats::default(),
        }
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Resolved copy of `tree`
    pub fn walk(&mut self, tree: &TokenTree, collector: &mut DiagnosticCollector) -> TokenTree {
        TokenTree::new(self.walk_group(tree.root(), "", collector))
    }

    fn walk_group(
        &mut self,
        group: &TokenGroup,
        prefix: &str,
        collector: &mut DiagnosticCollector,
    ) -> TokenGroup {
        let mut output = TokenGroup::new();

        for (key, node) in group.iter() {
            let path = join_path(prefix, key);
            let resolved = match node {
                TokenNode::Token(token) => {
                    TokenNode::Token(self.resolve_token(token, &path, collector))
                }
                TokenNode::Group(child) => {
                    TokenNode::Group(self.walk_group(child, &path, collector))
                }
                TokenNode::Raw(value) => TokenNode::Raw(value.clone()),
            };
            output.insert(key.clone(), resolved);
        }

        output
    }

    fn resolve_token(
        &mut self,
        token: &Token,
        path: &str,
        collector: &mut DiagnosticCollector,
    ) -> Token {
        let warnings_before = collector.warning_count();
        collector.enter_token(path);
        let value = self.processor.process(&token.value, collector);
        collector.leave_token();

        self.stats.visited += 1;
        if collector.warning_count() > warnings_before {
            self.stats.unresolved += 1;
        }

        let mut resolved = token.clone();
        if value != token.value {
            self.stats.changed += 1;
            if resolved.original.is_none() {
                resolved.original = token.value_str().map(str::to_string);
            }
            resolved.value = value;
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FunctionCatalog, FunctionContext};
    use serde_json::json;

    fn walk(source: serde_json::Value) -> (TokenTree, WalkStats, DiagnosticCollector) {
        let tree = TokenTree::from_json(&source).unwrap();
        let catalog = FunctionCatalog::with_builtins();
        let context = FunctionContext::default();
        let mut walker = TreeWalker::new(ExpressionProcessor::new(&catalog, &context, &tree));
        let mut collector = DiagnosticCollector::silent();
        let resolved = walker.walk(&tree, &mut collector);
        (resolved, walker.stats(), collector)
    }

    #[test]
    fn test_walk_records_original_only_on_change() {
        let (resolved, stats, _) = walk(json!({
            "size": {
                "base": { "value": "16px", "type": "dimension" },
                "double": { "value": "multiply({size.base}, 2)" }
            }
        }));

        let base = resolved.lookup("size.base").unwrap();
        assert_eq!(base.value, json!("16px"));
        assert_eq!(base.original, None);
        assert_eq!(base.token_type.as_deref(), Some("dimension"));

        let double = resolved.lookup("size.double").unwrap();
        assert_eq!(double.value, json!("32px"));
        assert_eq!(double.original.as_deref(), Some("multiply({size.base}, 2)"));

        assert_eq!(
            stats,
            WalkStats {
                visited: 2,
                changed: 1,
                unresolved: 0
            }
        );
    }

    #[test]
    fn test_metadata_and_structure_preserved() {
        let source = json!({
            "$meta": { "version": 2, "value": "{not.a.token}" },
            "color": {
                "$description": "Palette",
                "shadow": { "value": { "x": 0, "y": 1 } }
            }
        });
        let (resolved, stats, collector) = walk(source.clone());

        assert_eq!(resolved.to_json(), source);
        assert_eq!(stats.visited, 1);
        assert_eq!(stats.changed, 0);
        assert!(collector.events().is_empty());
    }

    #[test]
    fn test_warnings_tagged_with_token_path() {
        let (resolved, stats, collector) = walk(json!({
            "loop": {
                "a": { "value": "{loop.b}" },
                "b": { "value": "{loop.a}" }
            },
            "missing": { "value": "{nowhere}" }
        }));

        assert_eq!(resolved.lookup("loop.a").unwrap().value, json!("{loop.b}"));
        assert_eq!(resolved.lookup("loop.b").unwrap().value, json!("{loop.a}"));
        assert_eq!(stats.unresolved, 3);
        assert_eq!(stats.changed, 0);

        let by_token = collector.by_token();
        assert!(by_token.contains_key("loop.a"));
        assert!(by_token.contains_key("missing"));
        assert!(!by_token.contains_key("<value>"));
    }

    #[test]
    fn test_unresolved_counted_past_retention_limit() {
        let total = dtk_core::logging::config::get_max_diagnostics() + 10;
        let mut group = serde_json::Map::new();
        for i in 0..total {
            group.insert(format!("t{}", i), json!({ "value": "{nowhere}" }));
        }
        let (_, stats, collector) = walk(json!({ "missing": group }));

        assert_eq!(stats.visited, total);
        assert_eq!(stats.unresolved, total);
        assert_eq!(collector.dropped(), 10);
    }

    #[test]
    fn test_calls_through_mutual_references_terminate() {
        let (resolved, stats, collector) = walk(json!({
            "a": { "value": "tint({b}, 10%)" },
            "b": { "value": "shade({a}, 10%)" },
            "c": { "value": "mix({a}, #ffffff)" }
        }));

        assert_eq!(resolved.lookup("a").unwrap().value, json!("tint({b}, 10%)"));
        assert_eq!(resolved.lookup("b").unwrap().value, json!("shade({a}, 10%)"));
        assert_eq!(resolved.lookup("c").unwrap().value, json!("mix({a}, #ffffff)"));
        assert_eq!(stats.changed, 0);
        assert_eq!(stats.unresolved, 3);
        assert!(collector.events().iter().all(|e| e.code.as_str() == "W140"));
    }

    #[test]
    fn test_input_tree_unchanged() {
        let source = json!({ "a": { "value": "add(1px, 1px)" } });
        let tree = TokenTree::from_json(&source).unwrap();
        let catalog = FunctionCatalog::with_builtins();
        let context = FunctionContext::default();
        let mut walker = TreeWalker::new(ExpressionProcessor::new(&catalog, &context, &tree));

        let resolved = walker.walk(&tree, &mut DiagnosticCollector::silent());
        assert_eq!(tree.to_json(), source);
        assert_eq!(resolved.lookup("a").unwrap().value, json!("2px"));
    }
}
