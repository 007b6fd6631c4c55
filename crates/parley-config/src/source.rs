//! Configuration sources.
//!
//! A source yields raw key/value pairs; validation happens in
//! [`crate::ConfigRegistry::load`]. Sources pass every key through,
//! declared or not, so type errors are reported by the registry in
//! declaration order. The usual stack is [`EmbeddedDefaults`] <
//! [`JsonFileSource`] < [`EnvSource`], merged by [`LayeredSource`] with
//! figment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use parley_shared::constants::{self, keys};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::schema;
use crate::value::RawValue;

/// Raw key/value pairs produced by a source.
pub type RawValues = BTreeMap<String, RawValue>;

/// Anything that can supply configuration key/value pairs.
pub trait ConfigSource {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    fn values(&self) -> Result<RawValues>;
}

impl<S: ConfigSource + ?Sized> ConfigSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn values(&self) -> Result<RawValues> {
        (**self).values()
    }
}

fn extract(figment: &Figment, source_name: &str) -> Result<RawValues> {
    figment.extract::<RawValues>().map_err(|e| ConfigError::Source {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

// -- In-memory --

/// Fixed key/value pairs held in memory.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    name: String,
    values: RawValues,
}

impl MapSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: RawValues::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.values.remove(key)
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut source = MapSource::new("map");
        for (key, value) in iter {
            source.insert(key, value);
        }
        source
    }
}

impl ConfigSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> Result<RawValues> {
        Ok(self.values.clone())
    }
}

// -- Embedded defaults --

/// Stock value of every key the application ships with.
///
/// The push app id is a placeholder, so loading these values without an
/// override fails. Calling SDK credentials are omitted, which leaves calling
/// disabled unless a later layer supplies both.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedDefaults;

impl ConfigSource for EmbeddedDefaults {
    fn name(&self) -> &str {
        "defaults"
    }

    fn values(&self) -> Result<RawValues> {
        let mut values = RawValues::new();
        values.insert(keys::APP_ID.into(), constants::PLACEHOLDER_SECRET.into());
        values.insert(keys::TAB_INDEX.into(), constants::DEFAULT_TAB_INDEX.into());
        values.insert(keys::COUNTRY.into(), constants::DEFAULT_COUNTRY.into());
        values.insert(keys::VIDEO_LENGTH.into(), constants::VIDEO_LENGTH_SECS.into());

        for spec in schema::declared() {
            if let schema::Requirement::Default(default) = spec.requirement {
                values.insert(spec.key.to_string(), default.into());
            }
        }
        Ok(values)
    }
}

// -- Environment --

/// Reads `<PREFIX><SCREAMING_SNAKE_KEY>` for every declared key.
///
/// Values are kept as strings; numerics and enumerants are parsed by the
/// registry. A matching variable that is not valid UTF-8 is a type error.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
}

impl EnvSource {
    /// Process environment with the `PARLEY_` prefix.
    pub fn new() -> Self {
        Self::with_prefix(constants::ENV_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn provider(&self) -> Env {
        Env::prefixed(&self.prefix)
            .filter_map(|suffix| schema::lookup_env_suffix(suffix.as_str()).map(Into::into))
            .lowercase(false)
    }

    /// Declared key whose variable is set but not valid UTF-8, if any.
    fn non_unicode_key(&self) -> Option<&'static str> {
        std::env::vars_os().find_map(|(name, value)| {
            if value.to_str().is_some() {
                return None;
            }
            let name = name.to_str()?;
            let suffix = strip_prefix_ignore_case(name, &self.prefix)?;
            schema::lookup_env_suffix(suffix)
        })
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &name[prefix.len()..])
}

impl ConfigSource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn values(&self) -> Result<RawValues> {
        if let Some(key) = self.non_unicode_key() {
            return Err(ConfigError::type_mismatch(
                key,
                "UTF-8 string",
                "non-UTF-8 bytes",
            ));
        }

        let values: RawValues = self
            .provider()
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), RawValue::Text(value)))
            .collect();
        Ok(values)
    }
}

// -- JSON file --

/// A JSON object mapping keys to values.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
    required: bool,
}

impl JsonFileSource {
    /// A file that must exist.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: format!("file:{}", path.display()),
            path,
            required: true,
        }
    }

    /// A file that contributes nothing when it does not exist.
    pub fn optional(path: impl AsRef<Path>) -> Self {
        Self {
            required: false,
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self) -> Result<RawValues> {
        // Resolve up front so figment reads exactly this file rather than
        // searching parent directories for a relative name.
        let path = match std::fs::canonicalize(&self.path) {
            Ok(path) => path,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if self.required {
                    return Err(ConfigError::Source {
                        source_name: self.name.clone(),
                        message: "file not found".to_string(),
                    });
                }
                debug!(path = %self.path.display(), "Optional config file absent");
                return Ok(RawValues::new());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        extract(&Figment::from(Json::file(path)), &self.name)
    }
}

// -- Layering --

/// Sources merged in order; later layers override earlier ones key by key.
#[derive(Default)]
pub struct LayeredSource {
    layers: Vec<Box<dyn ConfigSource + Send + Sync>>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, layer: impl ConfigSource + Send + Sync + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl ConfigSource for LayeredSource {
    fn name(&self) -> &str {
        "layered"
    }

    fn values(&self) -> Result<RawValues> {
        let mut figment = Figment::new();
        for layer in &self.layers {
            let values = layer.values()?;
            debug!(source = layer.name(), keys = values.len(), "Merging configuration layer");
            figment = figment.merge(Serialized::defaults(values));
        }
        extract(&figment, self.name())
    }
}
