//! Shared types for skillhud.
//!
//! Everything here crosses a boundary: the native shell emits level-up
//! payloads and answers config/platform queries as JSON, the frontend and
//! the core crate both consume them.

pub mod formatting;

use serde::{Deserialize, Serialize};

/// Name of the event the native shell emits on every skill level increase.
pub const SKILL_LEVEL_UP_EVENT: &str = "skill-level-up";

/// Name of the event the native shell emits when the OS hands it a deep link.
pub const DEEP_LINK_EVENT: &str = "deep-link";

// ─────────────────────────────────────────────────────────────────────────────
// Level-up events
// ─────────────────────────────────────────────────────────────────────────────

/// Raw level-up notification as delivered by the event source.
///
/// Some sources omit the timestamp; see [`LevelUpEvent::from_payload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpPayload {
    pub skill: String,
    pub old_level: i32,
    pub new_level: i32,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// A skill level increase, immutable once created.
///
/// `timestamp` (epoch milliseconds) doubles as the identity of the
/// occurrence for side-effect de-duplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpEvent {
    pub skill: String,
    pub old_level: i32,
    pub new_level: i32,
    pub timestamp: i64,
}

impl LevelUpEvent {
    pub fn new(skill: impl Into<String>, old_level: i32, new_level: i32, timestamp: i64) -> Self {
        Self {
            skill: skill.into(),
            old_level,
            new_level,
            timestamp,
        }
    }

    /// Build an event from a source payload, using `received_at_ms` when the
    /// source did not stamp it.
    pub fn from_payload(payload: LevelUpPayload, received_at_ms: i64) -> Self {
        Self {
            skill: payload.skill,
            old_level: payload.old_level,
            new_level: payload.new_level,
            timestamp: payload.timestamp.unwrap_or(received_at_ms),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    /// Client-generated notice, rendered without a sender
    #[default]
    System,
    /// Line typed by a player
    Player,
}

/// One line in the chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `None` for system lines
    pub sender: Option<String>,
    pub text: String,
    pub kind: ChatKind,
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            sender: None,
            text: text.into(),
            kind: ChatKind::System,
            timestamp,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Platform
// ─────────────────────────────────────────────────────────────────────────────

/// Operating environment reported by the native shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    #[serde(alias = "darwin")]
    MacOs,
    Linux,
    Android,
    Ios,
    /// Plain browser tab, no native shell
    #[default]
    Web,
}

impl Platform {
    /// Map an OS name as reported by the shell (`std::env::consts::OS` style)
    /// to a platform. Unknown names are treated as a browser.
    pub fn from_os_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" => Self::Windows,
            "macos" | "darwin" | "osx" => Self::MacOs,
            "linux" | "freebsd" | "openbsd" | "netbsd" => Self::Linux,
            "android" => Self::Android,
            "ios" => Self::Ios,
            _ => Self::Web,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Web => "Web",
        }
    }
}

/// Answer to a platform query from the native shell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub platform: Platform,
    #[serde(default)]
    pub os_version: Option<String>,
    #[serde(default)]
    pub app_version: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration persisted by the native shell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub notifications: NotificationConfig,
    pub account: AccountConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// 0-100
    pub master_volume: u8,
    /// 0-100, applied on top of the master volume
    pub effects_volume: u8,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            master_volume: 80,
            effects_volume: 100,
        }
    }
}

impl AudioConfig {
    /// Output gain for sound effects in `0.0..=1.0`. Zero means muted.
    pub fn effective_gain(&self) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        let master = self.master_volume.min(100) as f32 / 100.0;
        let effects = self.effects_volume.min(100) as f32 / 100.0;
        master * effects
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Post a system chat line for every level-up
    pub chat_messages: bool,
    /// How long the popup stays up before it dismisses itself
    pub popup_duration_ms: u32,
    /// Processed timestamps older than this are forgotten
    pub retention_ms: i64,
    /// How often forgotten timestamps are swept
    pub purge_interval_ms: i64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            chat_messages: true,
            popup_duration_ms: 5000,
            retention_ms: 60_000,
            purge_interval_ms: 30_000,
        }
    }
}

/// Sign-in through the system browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Provider authorization page; sign-in is hidden when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorize_url: Option<String>,
    /// Deep-link scheme the provider redirects back to
    pub callback_scheme: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            authorize_url: None,
            callback_scheme: "skillhud".to_string(),
        }
    }
}
