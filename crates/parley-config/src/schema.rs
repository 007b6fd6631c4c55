//! Declared configuration keys.
//!
//! Every key the registry accepts is listed in [`KEYS`] together with its
//! kind, whether it must be supplied, and how its value is validated. Lookups
//! of anything not listed here are programming errors.

use parley_shared::constants::{self, keys};
use parley_shared::{Enumerant, LoginMethod, MediaRetention, NetworkPolicy, ParseEnumError};

use crate::error::{ConfigError, Result};
use crate::value::{EnumValue, RawValue, Secret, Value, ValueKind};

/// Whether a key must be supplied by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    /// May be left out; the registry then has no entry for it.
    Optional,
    Default(DefaultValue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Text(&'static str),
    Integer(i64),
}

impl From<DefaultValue> for RawValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Text(s) => RawValue::Text(s.to_string()),
            DefaultValue::Integer(n) => RawValue::Integer(n),
        }
    }
}

/// Closed set an enum-kind key draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSet {
    NetworkPolicy,
    MediaRetention,
    LoginMethod,
}

/// Validation applied to a key's value. Determines its [`ValueKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Secret,
    Endpoint,
    Label,
    Range { min: i64, max: i64 },
    Enum(EnumSet),
}

/// Metadata for a single declared key.
#[derive(Debug, Clone)]
pub struct KeySpec {
    pub key: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
    pub rule: Rule,
}

/// Keys that must be supplied together or not at all.
pub static GROUPS: [(&str, &str); 1] = [(keys::CALL_KEY, keys::CALL_SECRET)];

pub static KEYS: [KeySpec; 17] = [
    // ==================== credentials ====================
    KeySpec {
        key: keys::APP_ID,
        description: "Push-notification service app id",
        requirement: Requirement::Required,
        rule: Rule::Secret,
    },
    KeySpec {
        key: keys::CALL_HOST,
        description: "Calling SDK environment host",
        requirement: Requirement::Default(DefaultValue::Text(constants::DEFAULT_CALL_HOST)),
        rule: Rule::Endpoint,
    },
    KeySpec {
        key: keys::CALL_KEY,
        description: "Calling SDK application key",
        requirement: Requirement::Optional,
        rule: Rule::Secret,
    },
    KeySpec {
        key: keys::CALL_SECRET,
        description: "Calling SDK application secret",
        requirement: Requirement::Optional,
        rule: Rule::Secret,
    },
    // ==================== launch ====================
    KeySpec {
        key: keys::TAB_INDEX,
        description: "Tab selected on launch",
        requirement: Requirement::Required,
        rule: Rule::Range { min: 0, max: 3 },
    },
    KeySpec {
        key: keys::COUNTRY,
        description: "Preselected entry in the country-code picker",
        requirement: Requirement::Required,
        rule: Rule::Range {
            min: 0,
            max: u32::MAX as i64,
        },
    },
    // ==================== media ====================
    KeySpec {
        key: keys::VIDEO_LENGTH,
        description: "Maximum recorded video length in seconds",
        requirement: Requirement::Required,
        rule: Rule::Range {
            min: 1,
            max: constants::MAX_VIDEO_LENGTH_SECS,
        },
    },
    KeySpec {
        key: keys::PHOTO_NETWORK,
        description: "Auto-download policy for photos",
        requirement: Requirement::Default(DefaultValue::Text("any")),
        rule: Rule::Enum(EnumSet::NetworkPolicy),
    },
    KeySpec {
        key: keys::VIDEO_NETWORK,
        description: "Auto-download policy for videos",
        requirement: Requirement::Default(DefaultValue::Text("any")),
        rule: Rule::Enum(EnumSet::NetworkPolicy),
    },
    KeySpec {
        key: keys::AUDIO_NETWORK,
        description: "Auto-download policy for audio",
        requirement: Requirement::Default(DefaultValue::Text("any")),
        rule: Rule::Enum(EnumSet::NetworkPolicy),
    },
    KeySpec {
        key: keys::KEEP_MEDIA,
        description: "How long downloaded media is cached",
        requirement: Requirement::Default(DefaultValue::Text("forever")),
        rule: Rule::Enum(EnumSet::MediaRetention),
    },
    // ==================== account ====================
    KeySpec {
        key: keys::LOGIN_METHOD,
        description: "Sign-in method offered first",
        requirement: Requirement::Default(DefaultValue::Text("Email")),
        rule: Rule::Enum(EnumSet::LoginMethod),
    },
    KeySpec {
        key: keys::SHARE_TEXT,
        description: "Text attached when inviting someone to the app",
        requirement: Requirement::Default(DefaultValue::Text(constants::DEFAULT_SHARE_TEXT)),
        rule: Rule::Label,
    },
    // ==================== notification channels ====================
    KeySpec {
        key: keys::APP_STARTED_CHANNEL,
        description: "Channel posted once the app has finished launching",
        requirement: Requirement::Default(DefaultValue::Text(constants::CHANNEL_APP_STARTED)),
        rule: Rule::Label,
    },
    KeySpec {
        key: keys::USER_LOGGED_IN_CHANNEL,
        description: "Channel posted after sign-in",
        requirement: Requirement::Default(DefaultValue::Text(constants::CHANNEL_USER_LOGGED_IN)),
        rule: Rule::Label,
    },
    KeySpec {
        key: keys::USER_LOGGED_OUT_CHANNEL,
        description: "Channel posted after sign-out",
        requirement: Requirement::Default(DefaultValue::Text(constants::CHANNEL_USER_LOGGED_OUT)),
        rule: Rule::Label,
    },
    KeySpec {
        key: keys::CLEANUP_CHAT_VIEW_CHANNEL,
        description: "Channel telling open chat views to close",
        requirement: Requirement::Default(DefaultValue::Text(
            constants::CHANNEL_CLEANUP_CHAT_VIEW,
        )),
        rule: Rule::Label,
    },
];

/// All declared keys, in validation order.
pub fn declared() -> &'static [KeySpec] {
    &KEYS
}

pub fn lookup(key: &str) -> Option<&'static KeySpec> {
    KEYS.iter().find(|spec| spec.key == key)
}

/// Environment variable for `key`: the prefix followed by the key in
/// SCREAMING_SNAKE_CASE (`videoLength` -> `PARLEY_VIDEO_LENGTH`).
pub fn env_var_name(prefix: &str, key: &str) -> String {
    let mut name = String::with_capacity(prefix.len() + key.len() + 4);
    name.push_str(prefix);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            name.push('_');
        }
        name.push(c.to_ascii_uppercase());
    }
    name
}

/// Declared key whose variable name, minus the prefix, is `suffix`
/// (`VIDEO_LENGTH` -> `videoLength`). Case-insensitive.
pub fn lookup_env_suffix(suffix: &str) -> Option<&'static str> {
    KEYS.iter()
        .map(|spec| spec.key)
        .find(|key| env_var_name("", key).eq_ignore_ascii_case(suffix))
}

/// Sample values that must never reach a running deployment.
const PLACEHOLDERS: &[&str] = &[
    constants::PLACEHOLDER_SECRET,
    "REPLACE-ME",
    "CHANGE_ME",
    "CHANGEME",
    "TODO",
    "SECRET",
    "YOUR_API_KEY",
    "00000000-0000-0000-0000-000000000000",
];

pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }
    if value.starts_with('<') && value.ends_with('>') {
        return true;
    }
    if value.len() >= 3 && value.chars().all(|c| c == 'x' || c == 'X') {
        return true;
    }
    PLACEHOLDERS.iter().any(|p| p.eq_ignore_ascii_case(value))
}

impl KeySpec {
    pub fn kind(&self) -> ValueKind {
        match self.rule {
            Rule::Secret => ValueKind::Secret,
            Rule::Endpoint => ValueKind::Endpoint,
            Rule::Label => ValueKind::Label,
            Rule::Range { .. } => ValueKind::Numeric,
            Rule::Enum(_) => ValueKind::Enum,
        }
    }

    /// Check `raw` against this key's rule and convert it to a typed value.
    pub fn coerce(&self, raw: &RawValue) -> Result<Value> {
        match self.rule {
            Rule::Secret => {
                let text = self.expect_text(raw)?;
                if is_placeholder(text) {
                    return Err(ConfigError::PlaceholderSecret(self.key.to_string()));
                }
                Ok(Value::Secret(Secret::new(text.trim())))
            }
            Rule::Endpoint => {
                let text = self.expect_text(raw)?.trim();
                if text.is_empty() {
                    return Err(ConfigError::type_mismatch(self.key, "host name", "empty string"));
                }
                if text.contains("://") || text.contains(char::is_whitespace) {
                    return Err(ConfigError::type_mismatch(
                        self.key,
                        "host name",
                        format!("{text:?}"),
                    ));
                }
                Ok(Value::Endpoint(text.to_string()))
            }
            Rule::Label => {
                let text = self.expect_text(raw)?;
                if text.trim().is_empty() {
                    return Err(ConfigError::type_mismatch(
                        self.key,
                        "non-empty string",
                        "empty string",
                    ));
                }
                Ok(Value::Label(text.to_string()))
            }
            Rule::Range { min, max } => {
                let n = match raw {
                    RawValue::Integer(n) => *n,
                    RawValue::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                        ConfigError::type_mismatch(self.key, "integer", format!("string {s:?}"))
                    })?,
                    RawValue::Unsupported(value) => {
                        return Err(ConfigError::type_mismatch(
                            self.key,
                            "integer",
                            format!("{} {value}", raw.type_name()),
                        ))
                    }
                };
                if n < min || n > max {
                    return Err(ConfigError::OutOfRange {
                        key: self.key.to_string(),
                        value: n,
                        min,
                        max,
                    });
                }
                Ok(Value::Numeric(n))
            }
            Rule::Enum(set) => {
                let parsed = match set {
                    EnumSet::NetworkPolicy => parse_enumerant::<NetworkPolicy>(raw).map(EnumValue::Network),
                    EnumSet::MediaRetention => {
                        parse_enumerant::<MediaRetention>(raw).map(EnumValue::Retention)
                    }
                    EnumSet::LoginMethod => parse_enumerant::<LoginMethod>(raw).map(EnumValue::Login),
                };
                parsed.map(Value::Enum).map_err(|e| {
                    ConfigError::type_mismatch(
                        self.key,
                        format!("{} ({})", e.kind, e.expected.join(", ")),
                        format!("{} {:?}", raw.type_name(), e.value),
                    )
                })
            }
        }
    }

    fn expect_text<'a>(&self, raw: &'a RawValue) -> Result<&'a str> {
        match raw {
            RawValue::Text(s) => Ok(s.as_str()),
            RawValue::Integer(_) | RawValue::Unsupported(_) => Err(ConfigError::type_mismatch(
                self.key,
                "string",
                raw.type_name(),
            )),
        }
    }
}

fn parse_enumerant<E: Enumerant>(raw: &RawValue) -> std::result::Result<E, ParseEnumError> {
    match raw {
        RawValue::Text(s) => match s.trim().parse::<i64>() {
            Ok(code) => E::from_code(code),
            Err(_) => E::from_label(s),
        },
        RawValue::Integer(code) => E::from_code(*code),
        RawValue::Unsupported(value) => E::from_label(&value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(key: &str) -> &'static KeySpec {
        lookup(key).unwrap()
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, a) in KEYS.iter().enumerate() {
            for b in &KEYS[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn test_defaults_pass_their_own_rules() {
        for spec in declared() {
            if let Requirement::Default(default) = spec.requirement {
                let value = spec.coerce(&default.into()).unwrap();
                assert_eq!(value.kind(), spec.kind(), "{}", spec.key);
            }
        }
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("PARLEY_", "appId"), "PARLEY_APP_ID");
        assert_eq!(
            env_var_name("PARLEY_", "cleanupChatViewChannel"),
            "PARLEY_CLEANUP_CHAT_VIEW_CHANNEL"
        );
        assert_eq!(env_var_name("", "country"), "COUNTRY");
    }

    #[test]
    fn test_lookup_env_suffix() {
        assert_eq!(lookup_env_suffix("VIDEO_LENGTH"), Some("videoLength"));
        assert_eq!(lookup_env_suffix("app_id"), Some("appId"));
        assert_eq!(lookup_env_suffix("DEBUG_MODE"), None);
    }

    #[test]
    fn test_placeholder_detection() {
        for value in ["", "   ", "REPLACE_ME", "replace_me", "<api-key>", "xxxx", "changeme"] {
            assert!(is_placeholder(value), "{value:?}");
        }
        for value in ["abc-123", "277d0aab-5925-475f-ba99-4af140776900", "xx"] {
            assert!(!is_placeholder(value), "{value:?}");
        }
    }

    #[test]
    fn test_numeric_accepts_decimal_strings() {
        let video = spec(keys::VIDEO_LENGTH);
        assert_eq!(video.coerce(&"5".into()).unwrap(), Value::Numeric(5));
        assert_eq!(video.coerce(&RawValue::Integer(5)).unwrap(), Value::Numeric(5));

        match video.coerce(&"five".into()).unwrap_err() {
            ConfigError::TypeMismatch { key, expected, .. } => {
                assert_eq!(key, "videoLength");
                assert_eq!(expected, "integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_numeric_range() {
        let tab = spec(keys::TAB_INDEX);
        assert!(tab.coerce(&RawValue::Integer(3)).is_ok());
        assert!(matches!(
            tab.coerce(&RawValue::Integer(4)),
            Err(ConfigError::OutOfRange { value: 4, .. })
        ));
        assert!(spec(keys::COUNTRY).coerce(&RawValue::Integer(-1)).is_err());
        assert!(spec(keys::VIDEO_LENGTH).coerce(&RawValue::Integer(0)).is_err());
    }

    #[test]
    fn test_enum_accepts_label_or_code() {
        let network = spec(keys::VIDEO_NETWORK);
        let wifi = Value::Enum(EnumValue::Network(NetworkPolicy::WifiOnly));
        assert_eq!(network.coerce(&"wifi".into()).unwrap(), wifi);
        assert_eq!(network.coerce(&RawValue::Integer(2)).unwrap(), wifi);
        assert_eq!(network.coerce(&"2".into()).unwrap(), wifi);

        let err = network.coerce(&"cellular".into()).unwrap_err();
        assert!(err.to_string().contains("manual, wifi, any"));

        // Login methods have no legacy codes.
        assert!(spec(keys::LOGIN_METHOD).coerce(&RawValue::Integer(1)).is_err());
    }

    #[test]
    fn test_text_kinds_reject_integers() {
        for key in [keys::APP_ID, keys::CALL_HOST, keys::SHARE_TEXT] {
            match spec(key).coerce(&RawValue::Integer(7)).unwrap_err() {
                ConfigError::TypeMismatch { expected, actual, .. } => {
                    assert_eq!(expected, "string");
                    assert_eq!(actual, "integer");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_other_json_types_are_mismatches() {
        let float = RawValue::Unsupported(serde_json::json!(5.5));
        match spec(keys::VIDEO_LENGTH).coerce(&float).unwrap_err() {
            ConfigError::TypeMismatch { expected, actual, .. } => {
                assert_eq!(expected, "integer");
                assert_eq!(actual, "number 5.5");
            }
            other => panic!("unexpected error: {other}"),
        }

        let flag = RawValue::Unsupported(serde_json::json!(true));
        assert!(matches!(
            spec(keys::SHARE_TEXT).coerce(&flag),
            Err(ConfigError::TypeMismatch { .. })
        ));
        assert!(matches!(
            spec(keys::KEEP_MEDIA).coerce(&flag),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_endpoint_must_be_bare_host() {
        let host = spec(keys::CALL_HOST);
        assert!(host.coerce(&"https://sandbox.sinch.com".into()).is_err());
        assert!(host.coerce(&"".into()).is_err());
        assert_eq!(
            host.coerce(&" clientapi.sinch.com ".into()).unwrap(),
            Value::Endpoint("clientapi.sinch.com".into())
        );
    }

    #[test]
    fn test_secret_rejects_placeholder() {
        let app_id = spec(keys::APP_ID);
        assert!(matches!(
            app_id.coerce(&"REPLACE_ME".into()),
            Err(ConfigError::PlaceholderSecret(k)) if k == "appId"
        ));
        assert!(app_id.coerce(&"abc-123".into()).is_ok());
    }
}
