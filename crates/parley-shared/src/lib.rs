// Vocabulary shared by every Parley component: closed enumerations, the
// delivery-status lifecycle and stock constants.

#[macro_use]
mod macros;

pub mod constants;
pub mod delivery;
pub mod error;
pub mod types;

pub use delivery::{DeliveryFacts, DeliveryStatus, DeliveryTracker};
pub use error::{ParseEnumError, TransitionError};
pub use types::{
    AppEvent, AudioPlaybackStatus, Enumerant, LoginMethod, MediaKind, MediaLoadStatus,
    MediaRetention, MessageKind, NetworkPolicy, Tab,
};
