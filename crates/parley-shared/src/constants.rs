/// Prefix of the environment variables read by the configuration loader
pub const ENV_PREFIX: &str = "PARLEY_";

/// Registry key names
pub mod keys {
    /// Push-notification service app id
    pub const APP_ID: &str = "appId";

    /// Calling SDK environment host, key and secret
    pub const CALL_HOST: &str = "callHost";
    pub const CALL_KEY: &str = "callKey";
    pub const CALL_SECRET: &str = "callSecret";

    pub const TAB_INDEX: &str = "tabIndex";
    pub const COUNTRY: &str = "country";
    pub const VIDEO_LENGTH: &str = "videoLength";

    /// Auto-download policy per media kind
    pub const PHOTO_NETWORK: &str = "photoNetwork";
    pub const VIDEO_NETWORK: &str = "videoNetwork";
    pub const AUDIO_NETWORK: &str = "audioNetwork";

    pub const KEEP_MEDIA: &str = "keepMedia";
    pub const LOGIN_METHOD: &str = "loginMethod";
    pub const SHARE_TEXT: &str = "shareText";

    /// Notification-channel names
    pub const APP_STARTED_CHANNEL: &str = "appStartedChannel";
    pub const USER_LOGGED_IN_CHANNEL: &str = "userLoggedInChannel";
    pub const USER_LOGGED_OUT_CHANNEL: &str = "userLoggedOutChannel";
    pub const CLEANUP_CHAT_VIEW_CHANNEL: &str = "cleanupChatViewChannel";
}

/// Stand-in written wherever a real credential must be supplied at deploy time
pub const PLACEHOLDER_SECRET: &str = "REPLACE_ME";

/// Calling SDK sandbox environment
pub const DEFAULT_CALL_HOST: &str = "sandbox.sinch.com";

/// Index of the tab selected on launch
pub const DEFAULT_TAB_INDEX: i64 = 0;

/// Position of the preselected entry in the country-code picker
pub const DEFAULT_COUNTRY: i64 = 188;

/// Maximum length of a recorded video in seconds
pub const VIDEO_LENGTH_SECS: i64 = 5;
pub const MAX_VIDEO_LENGTH_SECS: i64 = 600;

pub const DEFAULT_SHARE_TEXT: &str = "Check out Parley, a private chat app";

pub const CHANNEL_APP_STARTED: &str = "NotificationAppStarted";
pub const CHANNEL_USER_LOGGED_IN: &str = "NotificationUserLoggedIn";
pub const CHANNEL_USER_LOGGED_OUT: &str = "NotificationUserLoggedOut";
pub const CHANNEL_CLEANUP_CHAT_VIEW: &str = "NotificationCleanupChatView";
