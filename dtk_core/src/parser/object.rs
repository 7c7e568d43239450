//! Inline object literals such as `{ lightness: 0.1, hue: 20 }`

use super::{split_arguments, unquote};
use serde_json::{Map, Number, Value};

/// Braced text whose body holds at least one `key: value` pair
pub fn is_object_literal(value: &str) -> bool {
    parse_object_literal(value).is_some()
}

/// Parses `{ key: value, ... }`; numeric values become JSON numbers, the rest strings
pub fn parse_object_literal(value: &str) -> Option<Map<String, Value>> {
    let trimmed = value.trim();
    let body = trimmed.strip_prefix('{')?.strip_suffix('}')?;
    if !body.contains(':') {
        return None;
    }

    let mut map = Map::new();
    for pair in split_arguments(body) {
        let (key, raw) = pair.split_once(':')?;
        let key = unquote(key);
        if key.is_empty() {
            return None;
        }
        map.insert(key.to_string(), coerce(unquote(raw)));
    }

    Some(map)
}

fn coerce(raw: &str) -> Value {
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_pairs_with_numeric_coercion() {
        let map = parse_object_literal("{ lightness: 0.1, chroma: -0.02, hue: 'warm' }").unwrap();
        assert_eq!(map["lightness"], json!(0.1));
        assert_eq!(map["chroma"], json!(-0.02));
        assert_eq!(map["hue"], json!("warm"));
    }

    #[test]
    fn test_quoted_keys() {
        let map = parse_object_literal(r#"{"level": "AAA", "size": large}"#).unwrap();
        assert_eq!(map["level"], json!("AAA"));
        assert_eq!(map["size"], json!("large"));
    }

    #[test]
    fn test_rejects_non_objects() {
        assert_eq!(parse_object_literal("{color.primary}"), None);
        assert_eq!(parse_object_literal("{}"), None);
        assert_eq!(parse_object_literal("lightness: 0.1"), None);
        assert_eq!(parse_object_literal("{ a: 1, b }"), None);
        assert!(!is_object_literal("#fff"));
    }
}
