//! Token tree model
//!
//! A tree is a nested mapping of groups and token leaves. Keys starting with `$`
//! are metadata and are carried through untouched, as are non-object literals
//! that appear where a group or token was expected.

pub mod token;

pub use token::{KeyStyle, Token, ORIGINAL_KEY};

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("token tree root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("token tree is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl TreeError {
    pub fn not_an_object(value: &Value) -> Self {
        Self::NotAnObject {
            found: json_kind(value),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A node under a group key
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Token(Token),
    Group(TokenGroup),
    /// Metadata entries and stray literals, passed through verbatim
    Raw(Value),
}

impl TokenNode {
    fn from_entry(key: &str, value: &Value) -> Self {
        if key.starts_with('$') {
            return TokenNode::Raw(value.clone());
        }

        match value {
            Value::Object(object) => match Token::from_object(object) {
                Some(token) => TokenNode::Token(token),
                None => TokenNode::Group(TokenGroup::from_object(object)),
            },
            other => TokenNode::Raw(other.clone()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            TokenNode::Token(token) => token.to_json(),
            TokenNode::Group(group) => group.to_json(),
            TokenNode::Raw(value) => value.clone(),
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            TokenNode::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&TokenGroup> {
        match self {
            TokenNode::Group(group) => Some(group),
            _ => None,
        }
    }
}

/// A named collection of tokens and nested groups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenGroup {
    children: BTreeMap<String, TokenNode>,
}

impl TokenGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_object(object: &Map<String, Value>) -> Self {
        let children = object
            .iter()
            .map(|(key, value)| (key.clone(), TokenNode::from_entry(key, value)))
            .collect();
        Self { children }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.children
                .iter()
                .map(|(key, node)| (key.clone(), node.to_json()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&TokenNode> {
        self.children.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, node: TokenNode) -> Option<TokenNode> {
        self.children.insert(key.into(), node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TokenNode)> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Tokens in this group and every nested group
    pub fn token_count(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                TokenNode::Token(_) => 1,
                TokenNode::Group(group) => group.token_count(),
                TokenNode::Raw(_) => 0,
            })
            .sum()
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (key, node) in &self.children {
            let path = join_path(prefix, key);
            match node {
                TokenNode::Token(_) => out.push(path),
                TokenNode::Group(group) => group.collect_paths(&path, out),
                TokenNode::Raw(_) => {}
            }
        }
    }
}

pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// The root of a token tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTree {
    root: TokenGroup,
}

impl TokenTree {
    pub fn new(root: TokenGroup) -> Self {
        Self { root }
    }

    /// Build from a JSON value; only an object is a tree
    pub fn from_json(value: &Value) -> Result<Self, TreeError> {
        match value {
            Value::Object(object) => Ok(Self {
                root: TokenGroup::from_object(object),
            }),
            other => Err(TreeError::not_an_object(other)),
        }
    }

    /// Parse JSON text into a tree
    pub fn parse(source: &str) -> Result<Self, TreeError> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_json(&value)
    }

    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }

    pub fn root(&self) -> &TokenGroup {
        &self.root
    }

    /// Node at a dot-path: token, group or raw entry
    pub fn lookup_node(&self, path: &str) -> Option<&TokenNode> {
        let mut segments = path.split('.');
        let first = segments.next().filter(|s| !s.is_empty())?;
        let mut node = self.root.get(first)?;

        for segment in segments {
            if segment.is_empty() {
                return None;
            }
            node = node.as_group()?.get(segment)?;
        }

        Some(node)
    }

    /// Token at a dot-path, if the path ends on a token
    pub fn lookup(&self, path: &str) -> Option<&Token> {
        self.lookup_node(path)?.as_token()
    }

    /// Every token path, depth first in key order
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.root.collect_paths("", &mut paths);
        paths
    }

    pub fn token_count(&self) -> usize {
        self.root.token_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn sample() -> TokenTree {
        TokenTree::from_json(&json!({
            "$meta": { "version": 2 },
            "color": {
                "brand": { "value": "#6366f1", "type": "color" },
                "light": { "value": "tint({color.brand}, 80%)" },
                "$description": "Palette"
            },
            "shadow": {
                "card": { "$value": { "x": 0, "y": 2, "blur": 4 } }
            },
            "notes": "free text"
        }))
        .unwrap()
    }

    #[test]
    fn test_lookup_tokens_and_groups() {
        let tree = sample();
        assert_eq!(
            tree.lookup("color.brand").and_then(Token::value_str),
            Some("#6366f1")
        );
        assert!(tree.lookup("color").is_none());
        assert!(tree.lookup_node("color").and_then(TokenNode::as_group).is_some());
        assert!(tree.lookup("color.missing").is_none());
        assert!(tree.lookup("color..brand").is_none());
        assert!(tree.lookup("").is_none());
        assert!(tree.lookup("color.brand.value").is_none());
    }

    #[test]
    fn test_metadata_is_raw() {
        let tree = sample();
        assert_matches!(tree.lookup_node("$meta"), Some(TokenNode::Raw(_)));
        assert_matches!(tree.lookup_node("notes"), Some(TokenNode::Raw(_)));
        assert_matches!(tree.lookup_node("color.$description"), Some(TokenNode::Raw(_)));
    }

    #[test]
    fn test_paths_and_counts() {
        let tree = sample();
        assert_eq!(
            tree.paths(),
            vec!["color.brand", "color.light", "shadow.card"]
        );
        assert_eq!(tree.token_count(), 3);
    }

    #[test]
    fn test_json_roundtrip_preserves_structure() {
        let source = json!({
            "$meta": { "version": 2 },
            "size": { "base": { "value": "16px" }, "sm": { "$value": "12px" } }
        });
        let tree = TokenTree::from_json(&source).unwrap();
        assert_eq!(tree.to_json(), source);
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        assert_matches!(
            TokenTree::from_json(&json!(["a"])),
            Err(TreeError::NotAnObject { found: "an array" })
        );
        assert_matches!(TokenTree::parse("{ not json"), Err(TreeError::Json(_)));
    }
}
