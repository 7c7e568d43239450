//! Value parser
//!
//! Recognizes `name(args)` call syntax, splits argument lists on top-level commas and
//! parses primitive values. The parser only segments text; it never evaluates anything,
//! so nested calls come back as opaque argument substrings.

pub mod dimension;
pub mod object;

pub use dimension::{
    format_dimension, format_number, parse_dimension, try_parse_dimension, Dimension,
};
pub use object::{is_object_literal, parse_object_literal};

use regex::Regex;
use std::sync::OnceLock;

/// A call expression split into its name and raw argument strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<String>,
}

impl FunctionCall {
    /// Canonical `name(arg, arg)` text, used as the re-entrancy signature
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.args.join(", "))
    }
}

fn call_head_regex() -> &'static Regex {
    static CALL_HEAD: OnceLock<Regex> = OnceLock::new();
    CALL_HEAD.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_-]*)\(").expect("call head pattern is valid")
    })
}

/// Tracks nesting while scanning expression text
#[derive(Debug, Default)]
struct DepthTracker {
    paren: usize,
    brace: usize,
    quote: Option<char>,
}

impl DepthTracker {
    /// Feed one character; returns true when it is structural (outside quotes)
    fn feed(&mut self, ch: char) -> bool {
        if let Some(open) = self.quote {
            if ch == open {
                self.quote = None;
            }
            return false;
        }

        match ch {
            '\'' | '"' => {
                self.quote = Some(ch);
                false
            }
            '(' => {
                self.paren += 1;
                true
            }
            ')' => {
                self.paren = self.paren.saturating_sub(1);
                true
            }
            '{' => {
                self.brace += 1;
                true
            }
            '}' => {
                self.brace = self.brace.saturating_sub(1);
                true
            }
            _ => true,
        }
    }

    fn at_top_level(&self) -> bool {
        self.paren == 0 && self.brace == 0 && self.quote.is_none()
    }
}

/// Byte offset of the `)` matching the `(` at `open`, if any
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut tracker = DepthTracker::default();
    for (offset, ch) in text[open..].char_indices() {
        let structural = tracker.feed(ch);
        if structural && ch == ')' && tracker.paren == 0 {
            return Some(open + offset);
        }
    }
    None
}

/// True iff the trimmed value is a single `identifier(...)` spanning the whole string
pub fn is_function_call(value: &str) -> bool {
    call_span(value.trim()).is_some()
}

/// Returns (name, body) when `text` is exactly one call expression
fn call_span(text: &str) -> Option<(&str, &str)> {
    let head = call_head_regex().captures(text)?;
    let name = head.get(1)?;
    let open = name.end();
    let close = matching_paren(text, open)?;

    if close != text.len() - 1 {
        return None;
    }

    Some((name.as_str(), &text[open + 1..close]))
}

/// Extracts the function name and its top-level arguments
pub fn parse_function_call(value: &str) -> Option<FunctionCall> {
    let (name, body) = call_span(value.trim())?;
    Some(FunctionCall {
        name: name.to_string(),
        args: split_arguments(body),
    })
}

/// Splits on commas that are outside every `(...)`, `{...}` and quoted string
pub fn split_arguments(args: &str) -> Vec<String> {
    if args.trim().is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut tracker = DepthTracker::default();
    let mut current = String::new();

    for ch in args.chars() {
        let top_level_before = tracker.at_top_level();
        if ch == ',' && top_level_before {
            result.push(current.trim().to_string());
            current.clear();
            continue;
        }
        tracker.feed(ch);
        current.push(ch);
    }

    let last = current.trim();
    if !last.is_empty() {
        result.push(last.to_string());
    }

    result
}

/// Strips one pair of matching surrounding quotes
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'\'' || first == b'"') && first == last {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}
