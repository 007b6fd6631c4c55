use chrono::{DateTime, Duration, Utc};

use crate::constants::keys;
use crate::error::{ParseEnumError, TransitionError};

/// A member of a closed, fixed set that can be read from configuration either
/// by its label or by its legacy integer code.
pub trait Enumerant: Sized + Copy + 'static {
    /// Human-readable name of the set, used in error messages.
    const KIND: &'static str;

    fn label(self) -> &'static str;

    /// Legacy integer code, if the set has one.
    fn code(self) -> Option<i64>;

    fn from_label(s: &str) -> Result<Self, ParseEnumError>;

    fn from_code(code: i64) -> Result<Self, ParseEnumError>;
}

closed_enum! {
    /// Kind of media attached to a message.
    pub enum MediaKind as "media kind" {
        Photo => "photo" = 1,
        Video => "video" = 2,
        Audio => "audio" = 3,
    }
}

impl MediaKind {
    /// Extension of the cached file for this media kind.
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Photo => "jpg",
            Self::Video => "mp4",
            Self::Audio => "m4a",
        }
    }
}

closed_enum! {
    /// When media may be downloaded without the user asking for it.
    pub enum NetworkPolicy as "network policy" {
        ManualOnly => "manual" = 1,
        WifiOnly => "wifi" = 2,
        Any => "any" = 3,
    }
}

impl NetworkPolicy {
    pub fn requires_manual_download(self, on_wifi: bool) -> bool {
        match self {
            Self::ManualOnly => true,
            Self::WifiOnly => !on_wifi,
            Self::Any => false,
        }
    }
}

impl Default for NetworkPolicy {
    fn default() -> Self {
        Self::Any
    }
}

closed_enum! {
    /// How long downloaded media is kept in the local cache.
    pub enum MediaRetention as "media retention" {
        Week => "week" = 1,
        Month => "month" = 2,
        Forever => "forever" = 3,
    }
}

impl MediaRetention {
    /// Maximum age of a cached file, `None` when it is never evicted.
    pub fn max_age(self) -> Option<Duration> {
        match self {
            Self::Week => Some(Duration::days(7)),
            Self::Month => Some(Duration::days(30)),
            Self::Forever => None,
        }
    }

    pub fn is_expired(self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.max_age() {
            Some(age) => now - stored_at > age,
            None => false,
        }
    }
}

impl Default for MediaRetention {
    fn default() -> Self {
        Self::Forever
    }
}

closed_enum! {
    /// Payload kind of a chat message.
    pub enum MessageKind as "message kind" {
        Text => "text",
        Emoji => "emoji",
        Photo => "photo",
        Video => "video",
        Audio => "audio",
        Location => "location",
    }
}

impl MessageKind {
    pub fn media_kind(self) -> Option<MediaKind> {
        match self {
            Self::Photo => Some(MediaKind::Photo),
            Self::Video => Some(MediaKind::Video),
            Self::Audio => Some(MediaKind::Audio),
            Self::Text | Self::Emoji | Self::Location => None,
        }
    }
}

closed_enum! {
    /// Download progress of a media attachment.
    pub enum MediaLoadStatus as "media load status" {
        Unknown => "unknown" = 0,
        Loading => "loading" = 1,
        /// Waiting for the user to request the download.
        Manual => "manual" = 2,
        Succeeded => "succeeded" = 3,
    }
}

impl MediaLoadStatus {
    pub fn can_transition_to(self, next: Self) -> bool {
        use MediaLoadStatus::*;

        matches!(
            (self, next),
            (Unknown, Loading)
                | (Unknown, Manual)
                | (Manual, Loading)
                | (Loading, Manual)
                | (Loading, Succeeded)
        )
    }

    pub fn transition(self, next: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError::MediaLoad {
                from: self,
                to: next,
            })
        }
    }
}

closed_enum! {
    pub enum AudioPlaybackStatus as "audio playback status" {
        Stopped => "stopped" = 1,
        Playing => "playing" = 2,
    }
}

impl AudioPlaybackStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Stopped => Self::Playing,
            Self::Playing => Self::Stopped,
        }
    }
}

closed_enum! {
    /// How the user signed in.
    pub enum LoginMethod as "login method" {
        Email => "Email",
        Phone => "Phone",
    }
}

closed_enum! {
    /// Top-level tabs of the main window, coded by position.
    pub enum Tab as "tab" {
        Chats => "chats" = 0,
        People => "people" = 1,
        Groups => "groups" = 2,
        Settings => "settings" = 3,
    }
}

closed_enum! {
    /// In-process notifications broadcast between application components.
    pub enum AppEvent as "app event" {
        AppStarted => "app_started",
        UserLoggedIn => "user_logged_in",
        UserLoggedOut => "user_logged_out",
        /// A chat was deleted or left and any open chat view must close.
        CleanupChatView => "cleanup_chat_view",
    }
}

impl AppEvent {
    /// Registry key holding the notification-channel name for this event.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::AppStarted => keys::APP_STARTED_CHANNEL,
            Self::UserLoggedIn => keys::USER_LOGGED_IN_CHANNEL,
            Self::UserLoggedOut => keys::USER_LOGGED_OUT_CHANNEL,
            Self::CleanupChatView => keys::CLEANUP_CHAT_VIEW_CHANNEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_codes_parse() {
        assert_eq!(NetworkPolicy::from_label("wifi").unwrap(), NetworkPolicy::WifiOnly);
        assert_eq!(NetworkPolicy::from_label(" WiFi ").unwrap(), NetworkPolicy::WifiOnly);
        assert_eq!(NetworkPolicy::from_code(1).unwrap(), NetworkPolicy::ManualOnly);
        assert_eq!(MediaRetention::from_code(3).unwrap(), MediaRetention::Forever);
        assert_eq!("location".parse::<MessageKind>().unwrap(), MessageKind::Location);
        assert_eq!(Tab::from_code(2).unwrap(), Tab::Groups);
    }

    #[test]
    fn test_rejects_non_members() {
        let err = MediaKind::from_label("gif").unwrap_err();
        assert_eq!(err.kind, "media kind");
        assert_eq!(err.value, "gif");
        assert!(err.to_string().contains("photo, video, audio"));

        assert!(MediaKind::from_code(0).is_err());
        assert!(NetworkPolicy::from_code(4).is_err());
        // No legacy codes for message kinds.
        assert!(MessageKind::from_code(1).is_err());
    }

    #[test]
    fn test_codes_match_legacy_values() {
        assert_eq!(MediaLoadStatus::Unknown.code(), Some(0));
        assert_eq!(MediaLoadStatus::Succeeded.code(), Some(3));
        assert_eq!(AudioPlaybackStatus::Stopped.code(), Some(1));
        assert_eq!(LoginMethod::Phone.code(), None);
        assert_eq!(Tab::Chats.code(), Some(0));
        assert_eq!(Tab::Settings.code(), Some(3));
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&NetworkPolicy::ManualOnly).unwrap();
        assert_eq!(json, "\"manual\"");
        let kind: MessageKind = serde_json::from_str("\"emoji\"").unwrap();
        assert_eq!(kind, MessageKind::Emoji);
    }

    #[test]
    fn test_manual_download_rule() {
        assert!(NetworkPolicy::ManualOnly.requires_manual_download(true));
        assert!(NetworkPolicy::WifiOnly.requires_manual_download(false));
        assert!(!NetworkPolicy::WifiOnly.requires_manual_download(true));
        assert!(!NetworkPolicy::Any.requires_manual_download(false));
    }

    #[test]
    fn test_media_retention_expiry() {
        let now = Utc::now();
        let old = now - Duration::days(8);
        assert!(MediaRetention::Week.is_expired(old, now));
        assert!(!MediaRetention::Month.is_expired(old, now));
        assert!(!MediaRetention::Forever.is_expired(now - Duration::days(3650), now));
    }

    #[test]
    fn test_media_kind_mapping() {
        assert_eq!(MessageKind::Video.media_kind(), Some(MediaKind::Video));
        assert_eq!(MessageKind::Emoji.media_kind(), None);
        assert_eq!(MediaKind::Audio.file_extension(), "m4a");
    }

    #[test]
    fn test_media_load_transitions() {
        let status = MediaLoadStatus::Unknown
            .transition(MediaLoadStatus::Loading)
            .unwrap()
            .transition(MediaLoadStatus::Succeeded)
            .unwrap();
        assert_eq!(status, MediaLoadStatus::Succeeded);

        assert!(MediaLoadStatus::Succeeded
            .transition(MediaLoadStatus::Loading)
            .is_err());
        assert!(MediaLoadStatus::Manual.can_transition_to(MediaLoadStatus::Loading));
        assert!(!MediaLoadStatus::Unknown.can_transition_to(MediaLoadStatus::Succeeded));
    }

    #[test]
    fn test_audio_toggle() {
        assert_eq!(AudioPlaybackStatus::Stopped.toggled(), AudioPlaybackStatus::Playing);
        assert_eq!(AudioPlaybackStatus::Playing.toggled(), AudioPlaybackStatus::Stopped);
    }
}
