use std::fmt;

use parley_shared::{LoginMethod, MediaRetention, NetworkPolicy};
use serde::{Deserialize, Serialize};

/// Declared kind of a configuration entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// API key, app id or shared secret. Never logged.
    Secret,
    /// Host name of an external service.
    Endpoint,
    /// Member of a closed enumeration.
    Enum,
    Numeric,
    /// Free display text or a channel name.
    Label,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Secret => "secret",
            ValueKind::Endpoint => "endpoint",
            ValueKind::Enum => "enum",
            ValueKind::Numeric => "numeric",
            ValueKind::Label => "label",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value as supplied by a source, before validation.
///
/// Anything that is neither an integer nor a string (floats, booleans,
/// null, arrays, objects) is carried as `Unsupported` and rejected by the
/// registry only if its key is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Text(String),
    Unsupported(serde_json::Value),
}

impl RawValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Text(_) => "string",
            RawValue::Integer(_) => "integer",
            RawValue::Unsupported(serde_json::Value::Null) => "null",
            RawValue::Unsupported(serde_json::Value::Bool(_)) => "boolean",
            RawValue::Unsupported(serde_json::Value::Number(_)) => "number",
            RawValue::Unsupported(serde_json::Value::String(_)) => "string",
            RawValue::Unsupported(serde_json::Value::Array(_)) => "array",
            RawValue::Unsupported(serde_json::Value::Object(_)) => "object",
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Integer(value.into())
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Integer(value.into())
    }
}

/// A credential whose contents are redacted from `Debug` and `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Enumerant payload of an [`ValueKind::Enum`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumValue {
    Network(NetworkPolicy),
    Retention(MediaRetention),
    Login(LoginMethod),
}

impl EnumValue {
    pub fn label(self) -> &'static str {
        match self {
            EnumValue::Network(v) => v.as_str(),
            EnumValue::Retention(v) => v.as_str(),
            EnumValue::Login(v) => v.as_str(),
        }
    }
}

/// Validated payload of a configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Secret(Secret),
    Endpoint(String),
    Enum(EnumValue),
    Numeric(i64),
    Label(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Secret(_) => ValueKind::Secret,
            Value::Endpoint(_) => ValueKind::Endpoint,
            Value::Enum(_) => ValueKind::Enum,
            Value::Numeric(_) => ValueKind::Numeric,
            Value::Label(_) => ValueKind::Label,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    /// Text of an endpoint or label. Secrets are only reachable through
    /// [`Value::as_secret`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Endpoint(s) | Value::Label(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_secret(&self) -> Option<&Secret> {
        match self {
            Value::Secret(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<EnumValue> {
        match self {
            Value::Enum(e) => Some(*e),
            _ => None,
        }
    }
}

/// A single named, validated configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue {
    pub key: &'static str,
    pub value: Value,
}

impl ConfigValue {
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted() {
        let secret = Secret::new("LwwW9qmV40q1jBrEldaemw==");
        assert_eq!(format!("{secret:?}"), "Secret(***)");
        assert_eq!(secret.to_string(), "***");
        assert_eq!(secret.expose(), "LwwW9qmV40q1jBrEldaemw==");

        let value = Value::Secret(secret);
        assert!(!format!("{value:?}").contains("Lww"));
        assert_eq!(value.as_str(), None);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Numeric(5).as_i64(), Some(5));
        assert_eq!(Value::Label("x".into()).as_i64(), None);
        assert_eq!(
            Value::Enum(EnumValue::Network(NetworkPolicy::WifiOnly)).kind(),
            ValueKind::Enum
        );
        assert_eq!(EnumValue::Retention(MediaRetention::Week).label(), "week");
    }

    #[test]
    fn test_raw_value_from_json() {
        let raw: std::collections::BTreeMap<String, RawValue> =
            serde_json::from_str(r#"{"a": 5, "b": "5", "c": 5.5, "d": true, "e": null}"#).unwrap();
        assert_eq!(raw["a"], RawValue::Integer(5));
        assert_eq!(raw["b"], RawValue::Text("5".into()));
        assert_eq!(raw["c"].type_name(), "number");
        assert_eq!(raw["d"].type_name(), "boolean");
        assert_eq!(raw["e"].type_name(), "null");
    }
}
