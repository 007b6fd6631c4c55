//! # parley-config
//!
//! Typed, immutable application configuration for Parley.
//!
//! Every setting the application reads at start-up is declared once in
//! [`schema`], supplied by one or more [`source`]s, validated in a single pass
//! by [`ConfigRegistry::load`], and then shared read-only for the lifetime of
//! the process.

pub mod registry;
pub mod schema;
pub mod source;
pub mod value;

mod error;

pub use error::{ConfigError, Result};
pub use registry::{CallingCredentials, ConfigRegistry};
pub use source::{
    ConfigSource, EmbeddedDefaults, EnvSource, JsonFileSource, LayeredSource, MapSource, RawValues,
};
pub use value::{ConfigValue, EnumValue, RawValue, Secret, Value, ValueKind};
