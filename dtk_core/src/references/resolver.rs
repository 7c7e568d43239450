use super::{reference_regex, single_reference};
use crate::logging::{codes, DiagnosticCollector, LogEvent};
use crate::tree::{TokenNode, TokenTree};
use crate::log_debug;
use regex::Captures;
use serde_json::Value;

fn unchanged(text: String, _: &mut DiagnosticCollector) -> String {
    text
}

/// Resolves `{path}` references against one token tree
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'t> {
    tree: &'t TokenTree,
}

impl<'t> ReferenceResolver<'t> {
    pub fn new(tree: &'t TokenTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &'t TokenTree {
        self.tree
    }

    /// Substitute every reference in `value`.
    ///
    /// `visited` holds the chain of paths currently being expanded. A path already
    /// on the chain is a cycle; its placeholder is left verbatim. Paths are popped
    /// once expanded, so siblings may reference the same token again.
    pub fn resolve_references(
        &self,
        value: &str,
        visited: &mut Vec<String>,
        collector: &mut DiagnosticCollector,
    ) -> String {
        self.resolve_references_with(value, visited, collector, &mut unchanged)
    }

    /// Like [`resolve_references`](Self::resolve_references), passing each expanded
    /// token's text through `expanded` while that token is still on the chain
    pub fn resolve_references_with<F>(
        &self,
        value: &str,
        visited: &mut Vec<String>,
        collector: &mut DiagnosticCollector,
        expanded: &mut F,
    ) -> String
    where
        F: FnMut(String, &mut DiagnosticCollector) -> String,
    {
        if !value.contains('{') {
            return value.to_string();
        }

        reference_regex()
            .replace_all(value, |captures: &Captures<'_>| {
                let placeholder = &captures[0];
                let path = &captures[1];
                self.expand(placeholder, path, visited, collector, &mut *expanded)
            })
            .into_owned()
    }

    /// Resolve a token value, keeping the target's type for a whole-value reference
    pub fn resolve_value(
        &self,
        value: &Value,
        visited: &mut Vec<String>,
        collector: &mut DiagnosticCollector,
    ) -> Value {
        self.resolve_value_with(value, visited, collector, &mut unchanged)
    }

    /// [`resolve_value`](Self::resolve_value) with an expansion hook
    pub fn resolve_value_with<F>(
        &self,
        value: &Value,
        visited: &mut Vec<String>,
        collector: &mut DiagnosticCollector,
        expanded: &mut F,
    ) -> Value
    where
        F: FnMut(String, &mut DiagnosticCollector) -> String,
    {
        let Value::String(text) = value else {
            return value.clone();
        };

        if let Some(path) = single_reference(text) {
            if let Some(typed) = self.typed_target(path, visited) {
                log_debug!("Whole-value reference resolved to typed value",
                    "reference" => path
                );
                return typed;
            }
        }

        Value::String(self.resolve_references_with(text, visited, collector, expanded))
    }

    /// Non-string value reached by following whole-value references from `path`
    fn typed_target(&self, path: &str, visited: &mut Vec<String>) -> Option<Value> {
        if visited.iter().any(|p| p == path) {
            return None;
        }

        let token = self.tree.lookup(path)?;
        match &token.value {
            Value::String(inner) => {
                let next = single_reference(inner)?;
                visited.push(path.to_string());
                let typed = self.typed_target(next, visited);
                visited.pop();
                typed
            }
            Value::Null => None,
            other => Some(other.clone()),
        }
    }

    fn expand<F>(
        &self,
        placeholder: &str,
        path: &str,
        visited: &mut Vec<String>,
        collector: &mut DiagnosticCollector,
        expanded: &mut F,
    ) -> String
    where
        F: FnMut(String, &mut DiagnosticCollector) -> String,
    {
        if visited.iter().any(|p| p == path) {
            let mut chain = visited.clone();
            chain.push(path.to_string());
            collector.record(
                LogEvent::warning_with_code(
                    codes::references::REFERENCE_CYCLE,
                    &format!("Circular reference to '{}'", path),
                )
                .with_context("reference", path)
                .with_context("chain", &chain.join(" -> ")),
            );
            return placeholder.to_string();
        }

        let token = match self.tree.lookup_node(path) {
            Some(TokenNode::Token(token)) => token,
            Some(TokenNode::Group(_)) => {
                collector.record(
                    LogEvent::warning_with_code(
                        codes::references::REFERENCE_TO_GROUP,
                        &format!("Reference '{}' points at a group, not a token", path),
                    )
                    .with_context("reference", path),
                );
                return placeholder.to_string();
            }
            _ => {
                collector.record(
                    LogEvent::warning_with_code(
                        codes::references::UNRESOLVED_REFERENCE,
                        &format!("Unresolved reference '{}'", path),
                    )
                    .with_context("reference", path),
                );
                return placeholder.to_string();
            }
        };

        match &token.value {
            Value::String(inner) => {
                visited.push(path.to_string());
                let resolved =
                    self.resolve_references_with(inner, visited, collector, &mut *expanded);
                let resolved = expanded(resolved, collector);
                visited.pop();
                resolved
            }
            Value::Null => {
                collector.record(
                    LogEvent::warning_with_code(
                        codes::tree::INVALID_TOKEN,
                        &format!("Token '{}' has a null value", path),
                    )
                    .with_context("reference", path),
                );
                placeholder.to_string()
            }
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> TokenTree {
        TokenTree::from_json(&json!({
            "color": {
                "brand": { "value": "#6366f1" },
                "alias": { "value": "{color.brand}" },
                "border": { "value": "1px solid {color.alias}" }
            },
            "size": {
                "base": { "value": 16 },
                "ref": { "value": "{size.base}" }
            },
            "shadow": {
                "card": { "value": { "x": 0, "y": 2 } },
                "alias": { "$value": "{shadow.card}" }
            },
            "loop": {
                "a": { "value": "{loop.b}" },
                "b": { "value": "{loop.a}" },
                "self": { "value": "calc({loop.self} * 2)" }
            },
            "broken": { "value": null }
        }))
        .unwrap()
    }

    fn resolve(tree: &TokenTree, value: &str) -> (String, DiagnosticCollector) {
        let mut collector = DiagnosticCollector::silent();
        let resolved = ReferenceResolver::new(tree).resolve_references(
            value,
            &mut Vec::new(),
            &mut collector,
        );
        (resolved, collector)
    }

    fn codes_of(collector: &DiagnosticCollector) -> Vec<&'static str> {
        collector.events().iter().map(|e| e.code.as_str()).collect()
    }

    #[test]
    fn test_chained_and_interleaved_references() {
        let tree = tree();
        let (resolved, collector) = resolve(&tree, "{color.border}");
        assert_eq!(resolved, "1px solid #6366f1");
        assert!(collector.events().is_empty());

        let (resolved, _) = resolve(&tree, "{color.brand} and {color.brand}");
        assert_eq!(resolved, "#6366f1 and #6366f1");
    }

    #[test]
    fn test_missing_and_group_references_stay_verbatim() {
        let tree = tree();
        let (resolved, collector) = resolve(&tree, "mix({color.nope}, {color})");
        assert_eq!(resolved, "mix({color.nope}, {color})");
        assert_eq!(codes_of(&collector), vec!["W110", "W111"]);
    }

    #[test]
    fn test_cycles_leave_placeholders() {
        let tree = tree();
        let (resolved, collector) = resolve(&tree, "{loop.a}");
        assert_eq!(resolved, "{loop.a}");
        assert_eq!(codes_of(&collector), vec!["W140"]);
        assert_eq!(
            collector.events()[0].context.get("chain").map(String::as_str),
            Some("loop.a -> loop.b -> loop.a")
        );

        let (resolved, _) = resolve(&tree, "{loop.self}");
        assert_eq!(resolved, "calc({loop.self} * 2)");
    }

    #[test]
    fn test_non_string_targets_substitute_as_text() {
        let tree = tree();
        let (resolved, _) = resolve(&tree, "calc({size.base} * 1px)");
        assert_eq!(resolved, "calc(16 * 1px)");

        let (resolved, _) = resolve(&tree, "shadow: {shadow.card}");
        assert_eq!(resolved, r#"shadow: {"x":0,"y":2}"#);

        let (resolved, collector) = resolve(&tree, "{broken}");
        assert_eq!(resolved, "{broken}");
        assert_eq!(codes_of(&collector), vec!["W021"]);
    }

    #[test]
    fn test_whole_value_reference_keeps_type() {
        let tree = tree();
        let resolver = ReferenceResolver::new(&tree);
        let mut collector = DiagnosticCollector::silent();

        let value = resolver.resolve_value(&json!("{shadow.alias}"), &mut Vec::new(), &mut collector);
        assert_eq!(value, json!({ "x": 0, "y": 2 }));

        let value = resolver.resolve_value(&json!("{size.ref}"), &mut Vec::new(), &mut collector);
        assert_eq!(value, json!(16));

        let value = resolver.resolve_value(&json!("{color.alias}"), &mut Vec::new(), &mut collector);
        assert_eq!(value, json!("#6366f1"));

        let value = resolver.resolve_value(&json!(4), &mut Vec::new(), &mut collector);
        assert_eq!(value, json!(4));
    }

    #[test]
    fn test_expansion_hook_sees_each_token_on_the_chain() {
        let tree = tree();
        let resolver = ReferenceResolver::new(&tree);
        let mut collector = DiagnosticCollector::silent();
        let mut seen = Vec::new();

        let resolved = resolver.resolve_references_with(
            "{color.border}",
            &mut Vec::new(),
            &mut collector,
            &mut |text: String, _: &mut DiagnosticCollector| {
                seen.push(text.clone());
                text.to_uppercase()
            },
        );

        assert_eq!(seen, vec!["#6366f1", "#6366F1", "1px solid #6366F1"]);
        assert_eq!(resolved, "1PX SOLID #6366F1");
    }

    #[test]
    fn test_visited_is_unwound() {
        let tree = tree();
        let mut visited = Vec::new();
        let mut collector = DiagnosticCollector::silent();
        ReferenceResolver::new(&tree).resolve_references(
            "{color.border}",
            &mut visited,
            &mut collector,
        );
        assert!(visited.is_empty());
    }
}
