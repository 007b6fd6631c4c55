use thiserror::Error;

use crate::delivery::DeliveryStatus;
use crate::types::MediaLoadStatus;

/// A string or integer code that is not a member of the named closed set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value:?} (expected one of: {})", .expected.join(", "))]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl ParseEnumError {
    pub fn new(
        kind: &'static str,
        value: impl Into<String>,
        expected: &'static [&'static str],
    ) -> Self {
        Self {
            kind,
            value: value.into(),
            expected,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Illegal delivery transition: {from} -> {to}")]
    Delivery {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    #[error("Illegal media load transition: {from:?} -> {to:?}")]
    MediaLoad {
        from: MediaLoadStatus,
        to: MediaLoadStatus,
    },
}
