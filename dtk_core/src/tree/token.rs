use serde_json::{Map, Value};

/// Which key spelling a token was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStyle {
    /// `value` / `type` / `description`
    #[default]
    Legacy,
    /// `$value` / `$type` / `$description` (W3C design tokens format)
    Dtcg,
}

impl KeyStyle {
    pub fn value_key(self) -> &'static str {
        match self {
            KeyStyle::Legacy => "value",
            KeyStyle::Dtcg => "$value",
        }
    }

    pub fn type_key(self) -> &'static str {
        match self {
            KeyStyle::Legacy => "type",
            KeyStyle::Dtcg => "$type",
        }
    }

    pub fn description_key(self) -> &'static str {
        match self {
            KeyStyle::Legacy => "description",
            KeyStyle::Dtcg => "$description",
        }
    }
}

/// Key holding the pre-resolution expression
pub const ORIGINAL_KEY: &str = "original";

/// A leaf in the token tree
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: Value,
    pub token_type: Option<String>,
    pub description: Option<String>,
    pub original: Option<String>,
    /// Every other key on the token object, preserved verbatim
    pub extensions: Map<String, Value>,
    pub style: KeyStyle,
}

impl Token {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            token_type: None,
            description: None,
            original: None,
            extensions: Map::new(),
            style: KeyStyle::Legacy,
        }
    }

    pub fn with_type(mut self, token_type: &str) -> Self {
        self.token_type = Some(token_type.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// True when the object carries a `value` or `$value` key
    pub fn is_token_object(object: &Map<String, Value>) -> bool {
        object.contains_key(KeyStyle::Dtcg.value_key())
            || object.contains_key(KeyStyle::Legacy.value_key())
    }

    /// Build a token from its JSON object; `None` when the object is not a token
    pub fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let style = if object.contains_key(KeyStyle::Dtcg.value_key()) {
            KeyStyle::Dtcg
        } else if object.contains_key(KeyStyle::Legacy.value_key()) {
            KeyStyle::Legacy
        } else {
            return None;
        };

        let mut extensions = object.clone();
        let value = extensions.remove(style.value_key()).unwrap_or(Value::Null);

        let token_type = take_string(&mut extensions, style.type_key());
        let description = take_string(&mut extensions, style.description_key());
        let original = take_string(&mut extensions, ORIGINAL_KEY);

        Some(Self {
            value,
            token_type,
            description,
            original,
            extensions,
            style,
        })
    }

    /// Serialize back to a JSON object in the token's own key style
    pub fn to_json(&self) -> Value {
        let mut object = self.extensions.clone();
        object.insert(self.style.value_key().to_string(), self.value.clone());

        if let Some(token_type) = &self.token_type {
            object.insert(
                self.style.type_key().to_string(),
                Value::String(token_type.clone()),
            );
        }
        if let Some(description) = &self.description {
            object.insert(
                self.style.description_key().to_string(),
                Value::String(description.clone()),
            );
        }
        if let Some(original) = &self.original {
            object.insert(ORIGINAL_KEY.to_string(), Value::String(original.clone()));
        }

        Value::Object(object)
    }

    pub fn value_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// Remove `key` when it holds a string; other shapes stay in the extension map
fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(_)) => match object.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_token_roundtrip() {
        let source = json!({
            "value": "#0d6efd",
            "type": "color",
            "description": "Brand blue",
            "deprecated": true
        });
        let token = Token::from_object(source.as_object().unwrap()).unwrap();

        assert_eq!(token.style, KeyStyle::Legacy);
        assert_eq!(token.value_str(), Some("#0d6efd"));
        assert_eq!(token.token_type.as_deref(), Some("color"));
        assert_eq!(token.extensions.get("deprecated"), Some(&json!(true)));
        assert_eq!(token.to_json(), source);
    }

    #[test]
    fn test_dtcg_token_keeps_dialect() {
        let source = json!({ "$value": "16px", "$type": "dimension" });
        let mut token = Token::from_object(source.as_object().unwrap()).unwrap();
        assert_eq!(token.style, KeyStyle::Dtcg);

        token.original = Some("{size.base}".to_string());
        let output = token.to_json();
        assert_eq!(output["$value"], json!("16px"));
        assert_eq!(output["$type"], json!("dimension"));
        assert_eq!(output["original"], json!("{size.base}"));
        assert!(output.get("value").is_none());
    }

    #[test]
    fn test_non_string_metadata_is_preserved() {
        let source = json!({ "value": 4, "type": { "kind": "number" } });
        let token = Token::from_object(source.as_object().unwrap()).unwrap();
        assert_eq!(token.token_type, None);
        assert_eq!(token.to_json(), source);
    }

    #[test]
    fn test_group_objects_are_not_tokens() {
        let group = json!({ "primary": { "value": "#fff" } });
        assert!(Token::from_object(group.as_object().unwrap()).is_none());
    }
}
