//! Reference resolution
//!
//! `{dot.path}` placeholders are substituted textually with the target token's
//! value. Chains are followed depth first; the active chain doubles as the
//! cycle guard and is unwound as each reference finishes.

pub mod resolver;

pub use resolver::ReferenceResolver;

use regex::Regex;
use std::sync::OnceLock;

/// Path characters exclude whitespace, `:` and `,` so object literals never match
pub(crate) fn reference_regex() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    REFERENCE.get_or_init(|| {
        Regex::new(r"\{([^{}\s:,().]+(?:\.[^{}\s:,().]+)*)\}")
            .expect("reference pattern is valid")
    })
}

/// Every referenced path in order of appearance
pub fn find_references(value: &str) -> Vec<String> {
    reference_regex()
        .captures_iter(value)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The path when the whole (trimmed) value is exactly one reference
pub fn single_reference(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    let captures = reference_regex().captures(trimmed)?;
    let whole = captures.get(0)?;
    if whole.start() == 0 && whole.end() == trimmed.len() {
        captures.get(1).map(|m| m.as_str())
    } else {
        None
    }
}

pub fn contains_reference(value: &str) -> bool {
    reference_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_references() {
        assert_eq!(
            find_references("{border.width} solid {color.border}"),
            vec!["border.width", "color.border"]
        );
        assert!(find_references("#ffffff").is_empty());
        assert!(find_references("{ lightness: 0.1 }").is_empty());
        assert!(find_references("{lightness:0.1}").is_empty());
    }

    #[test]
    fn test_single_reference() {
        assert_eq!(single_reference("{shadow.card}"), Some("shadow.card"));
        assert_eq!(single_reference("  {size.2xl} "), Some("size.2xl"));
        assert_eq!(single_reference("{a} {b}"), None);
        assert_eq!(single_reference("tint({a}, 10%)"), None);
    }

    #[test]
    fn test_contains_reference() {
        assert!(contains_reference("mix({a}, {b})"));
        assert!(!contains_reference("mix(#fff, #000)"));
    }
}
