//! The validated, immutable configuration registry.
//!
//! A [`ConfigRegistry`] is built once at start-up with
//! [`ConfigRegistry::load`] and handed to components by reference or
//! `Arc`. Construction is all-or-nothing: either every declared key
//! validates or the caller gets the first failure in declaration order.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use parley_shared::constants::keys;
use parley_shared::{AppEvent, Enumerant, LoginMethod, MediaKind, MediaRetention, NetworkPolicy, Tab};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::schema::{self, Requirement};
use crate::source::{ConfigSource, EmbeddedDefaults, EnvSource, JsonFileSource, LayeredSource};
use crate::value::{ConfigValue, EnumValue, Secret, Value};

/// Calling SDK connection settings. Present only when both key and secret
/// were supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallingCredentials {
    pub host: String,
    pub key: Secret,
    pub secret: Secret,
}

/// Typed view of the entries, resolved once during load.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    push_app_id: Secret,
    calling: Option<CallingCredentials>,
    default_tab: Tab,
    default_country: u32,
    video_length: Duration,
    photo_network: NetworkPolicy,
    video_network: NetworkPolicy,
    audio_network: NetworkPolicy,
    media_retention: MediaRetention,
    login_method: LoginMethod,
    share_text: String,
    app_started_channel: String,
    user_logged_in_channel: String,
    user_logged_out_channel: String,
    cleanup_chat_view_channel: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRegistry {
    entries: BTreeMap<&'static str, ConfigValue>,
    settings: Settings,
}

impl ConfigRegistry {
    /// Validate everything `source` supplies against the declared keys.
    pub fn load<S: ConfigSource + ?Sized>(source: &S) -> Result<Self> {
        let mut raw = source.values()?;
        debug!(source = source.name(), keys = raw.len(), "Read configuration source");

        let mut entries = BTreeMap::new();
        for spec in schema::declared() {
            let value = match raw.remove(spec.key) {
                Some(value) => spec.coerce(&value)?,
                None => match spec.requirement {
                    Requirement::Required => {
                        warn!(
                            key = spec.key,
                            description = spec.description,
                            "Required configuration key not supplied"
                        );
                        return Err(ConfigError::MissingKey(spec.key.to_string()));
                    }
                    Requirement::Optional => continue,
                    Requirement::Default(default) => spec.coerce(&default.into())?,
                },
            };
            entries.insert(
                spec.key,
                ConfigValue {
                    key: spec.key,
                    value,
                },
            );
        }

        for key in raw.keys() {
            warn!(key = %key, source = source.name(), "Ignoring undeclared configuration key");
        }

        for (a, b) in &schema::GROUPS {
            match (entries.contains_key(a), entries.contains_key(b)) {
                (true, false) => return Err(incomplete(a, b)),
                (false, true) => return Err(incomplete(b, a)),
                _ => {}
            }
        }

        let settings = Settings::resolve(&entries)?;
        info!(
            source = source.name(),
            entries = entries.len(),
            calling_enabled = settings.calling.is_some(),
            "Configuration loaded"
        );

        Ok(Self { entries, settings })
    }

    /// Defaults, then the process environment (`PARLEY_*`).
    pub fn from_env() -> Result<Self> {
        Self::load(&LayeredSource::new().with(EmbeddedDefaults).with(EnvSource::new()))
    }

    /// Defaults, then the JSON file at `path`, then the process environment.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(
            &LayeredSource::new()
                .with(EmbeddedDefaults)
                .with(JsonFileSource::new(path))
                .with(EnvSource::new()),
        )
    }

    /// Entry for a declared key. Fails with [`ConfigError::UnknownKey`] for
    /// undeclared keys and [`ConfigError::Unset`] for optional keys nobody
    /// supplied.
    pub fn get(&self, key: &str) -> Result<&ConfigValue> {
        self.try_get(key)?
            .ok_or_else(|| ConfigError::Unset(key.to_string()))
    }

    /// Like [`ConfigRegistry::get`], but an unset optional key is `Ok(None)`.
    pub fn try_get(&self, key: &str) -> Result<Option<&ConfigValue>> {
        if schema::lookup(key).is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        Ok(self.entries.get(key))
    }

    /// Keys that hold a value, in lexical order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_app_id(&self) -> &Secret {
        &self.settings.push_app_id
    }

    pub fn calling(&self) -> Option<&CallingCredentials> {
        self.settings.calling.as_ref()
    }

    pub fn default_tab(&self) -> Tab {
        self.settings.default_tab
    }

    pub fn default_country(&self) -> u32 {
        self.settings.default_country
    }

    /// Longest video the user may record.
    pub fn video_length(&self) -> Duration {
        self.settings.video_length
    }

    pub fn network_policy(&self, kind: MediaKind) -> NetworkPolicy {
        match kind {
            MediaKind::Photo => self.settings.photo_network,
            MediaKind::Video => self.settings.video_network,
            MediaKind::Audio => self.settings.audio_network,
        }
    }

    pub fn media_retention(&self) -> MediaRetention {
        self.settings.media_retention
    }

    pub fn login_method(&self) -> LoginMethod {
        self.settings.login_method
    }

    pub fn share_text(&self) -> &str {
        &self.settings.share_text
    }

    pub fn event_channel(&self, event: AppEvent) -> &str {
        match event {
            AppEvent::AppStarted => &self.settings.app_started_channel,
            AppEvent::UserLoggedIn => &self.settings.user_logged_in_channel,
            AppEvent::UserLoggedOut => &self.settings.user_logged_out_channel,
            AppEvent::CleanupChatView => &self.settings.cleanup_chat_view_channel,
        }
    }
}

fn incomplete(present: &str, missing: &str) -> ConfigError {
    ConfigError::IncompleteGroup {
        present: present.to_string(),
        missing: missing.to_string(),
    }
}

type Entries = BTreeMap<&'static str, ConfigValue>;

impl Settings {
    fn resolve(entries: &Entries) -> Result<Self> {
        let secret = |key: &'static str| field(entries, key, |v| v.as_secret().cloned());
        let text = |key: &'static str| field(entries, key, |v| v.as_str().map(str::to_string));
        let network = |key: &'static str| {
            field(entries, key, |v| match v.as_enum() {
                Some(EnumValue::Network(policy)) => Some(policy),
                _ => None,
            })
        };

        // Group validation guarantees the secret is present alongside the key.
        let calling = if entries.contains_key(keys::CALL_KEY) {
            Some(CallingCredentials {
                host: text(keys::CALL_HOST)?,
                key: secret(keys::CALL_KEY)?,
                secret: secret(keys::CALL_SECRET)?,
            })
        } else {
            None
        };

        Ok(Self {
            push_app_id: secret(keys::APP_ID)?,
            calling,
            default_tab: field(entries, keys::TAB_INDEX, |v| {
                v.as_i64().and_then(|n| Tab::from_code(n).ok())
            })?,
            default_country: field(entries, keys::COUNTRY, |v| {
                v.as_i64().and_then(|n| u32::try_from(n).ok())
            })?,
            video_length: field(entries, keys::VIDEO_LENGTH, |v| {
                v.as_i64()
                    .and_then(|n| u64::try_from(n).ok())
                    .map(Duration::from_secs)
            })?,
            photo_network: network(keys::PHOTO_NETWORK)?,
            video_network: network(keys::VIDEO_NETWORK)?,
            audio_network: network(keys::AUDIO_NETWORK)?,
            media_retention: field(entries, keys::KEEP_MEDIA, |v| match v.as_enum() {
                Some(EnumValue::Retention(retention)) => Some(retention),
                _ => None,
            })?,
            login_method: field(entries, keys::LOGIN_METHOD, |v| match v.as_enum() {
                Some(EnumValue::Login(method)) => Some(method),
                _ => None,
            })?,
            share_text: text(keys::SHARE_TEXT)?,
            app_started_channel: text(keys::APP_STARTED_CHANNEL)?,
            user_logged_in_channel: text(keys::USER_LOGGED_IN_CHANNEL)?,
            user_logged_out_channel: text(keys::USER_LOGGED_OUT_CHANNEL)?,
            cleanup_chat_view_channel: text(keys::CLEANUP_CHAT_VIEW_CHANNEL)?,
        })
    }
}

/// Convert the validated entry for `key` into a settings field.
fn field<T>(entries: &Entries, key: &str, convert: impl FnOnce(&Value) -> Option<T>) -> Result<T> {
    let value = entries
        .get(key)
        .map(|entry| &entry.value)
        .ok_or_else(|| ConfigError::Unset(key.to_string()))?;
    convert(value).ok_or_else(|| {
        ConfigError::type_mismatch(key, "declared kind", value.kind().as_str())
    })
}
