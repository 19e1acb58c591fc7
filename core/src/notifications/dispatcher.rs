//! Fire-once presentation side effects for level-ups.
//!
//! Audio and chat are optional capabilities discovered through a
//! [`CapabilityProbe`]. A missing capability skips its channel; a failing
//! one is logged and ignored. Neither ever reaches the queue.

use skillhud_types::formatting::format_level_up_message;
use skillhud_types::{ChatMessage, LevelUpEvent};
use thiserror::Error;

use crate::audio::{FanfareKind, FanfarePlan};

use super::ProcessedSet;

/// Failure reported by an audio or chat backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("capability is not ready: {0}")]
    NotReady(String),
    #[error("capability call failed: {0}")]
    Failed(String),
}

/// Mixer channel a cue is routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChannel {
    Master,
    Effects,
}

/// Something that can play fanfares.
pub trait AudioCapability {
    /// Gain the cue would be heard at, `0.0` when muted.
    fn effective_gain(&self) -> f32;

    /// Schedule the fanfare for `level`, starting as soon as the backend is
    /// able to produce sound.
    fn play_when_ready(&self, level: i32, output: OutputChannel) -> Result<(), CapabilityError>;
}

/// Something that can show lines in the chat log.
pub trait ChatCapability {
    /// Append `message`. `broadcast` sends it to other players as well.
    fn append(&self, message: ChatMessage, broadcast: bool) -> Result<(), CapabilityError>;
}

/// Runtime discovery of optional capabilities.
pub trait CapabilityProbe {
    fn audio(&self) -> Option<&dyn AudioCapability> {
        None
    }

    fn chat(&self) -> Option<&dyn ChatCapability> {
        None
    }
}

/// Probe over borrowed capabilities.
#[derive(Clone, Copy, Default)]
pub struct Capabilities<'a> {
    pub audio: Option<&'a dyn AudioCapability>,
    pub chat: Option<&'a dyn ChatCapability>,
}

impl CapabilityProbe for Capabilities<'_> {
    fn audio(&self) -> Option<&dyn AudioCapability> {
        self.audio
    }

    fn chat(&self) -> Option<&dyn ChatCapability> {
        self.chat
    }
}

/// Probe for environments with neither audio nor chat.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapabilities;

impl CapabilityProbe for NoCapabilities {}

/// What a dispatch actually did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// Fanfare that was scheduled successfully
    pub fanfare: Option<FanfareKind>,
    /// Whether the chat line was appended successfully
    pub chat: bool,
}

/// Runs audio and chat side effects at most once per event timestamp.
#[derive(Debug, Clone)]
pub struct SideEffectDispatcher {
    processed: ProcessedSet,
    chat_enabled: bool,
}

impl SideEffectDispatcher {
    pub fn new(retention_ms: i64, chat_enabled: bool) -> Self {
        Self {
            processed: ProcessedSet::new(retention_ms),
            chat_enabled,
        }
    }

    /// Fire side effects for `event` unless its timestamp was already handled.
    ///
    /// Returns `None` when the event was already processed.
    pub fn dispatch(
        &mut self,
        event: &LevelUpEvent,
        probe: &dyn CapabilityProbe,
    ) -> Option<DispatchReport> {
        if self.processed.contains(event.timestamp) {
            return None;
        }

        let mut report = DispatchReport::default();

        if let Some(audio) = probe.audio() {
            let gain = audio.effective_gain();
            if gain > 0.0 {
                let kind = FanfarePlan::for_level(event.new_level).kind;
                match audio.play_when_ready(event.new_level, OutputChannel::Effects) {
                    Ok(()) => report.fanfare = Some(kind),
                    Err(e) => {
                        tracing::warn!(error = %e, level = event.new_level, "Failed to schedule level-up fanfare");
                    }
                }
            } else {
                tracing::debug!(gain, "Audio muted, skipping fanfare");
            }
        }

        if self.chat_enabled
            && let Some(chat) = probe.chat()
        {
            let text = format_level_up_message(&event.skill, event.new_level);
            match chat.append(ChatMessage::system(text, event.timestamp), false) {
                Ok(()) => report.chat = true,
                Err(e) => {
                    tracing::warn!(error = %e, skill = %event.skill, "Failed to append level-up chat line");
                }
            }
        }

        self.processed.insert(event.timestamp);
        tracing::info!(
            skill = %event.skill,
            level = event.new_level,
            timestamp = event.timestamp,
            fanfare = ?report.fanfare,
            chat = report.chat,
            "Dispatched level-up side effects"
        );
        Some(report)
    }

    pub fn is_processed(&self, timestamp: i64) -> bool {
        self.processed.contains(timestamp)
    }

    /// Forget timestamps older than the retention window.
    pub fn purge(&mut self, now_ms: i64) -> usize {
        self.processed.purge(now_ms)
    }

    pub fn processed_len(&self) -> usize {
        self.processed.len()
    }

    pub fn set_chat_enabled(&mut self, enabled: bool) {
        self.chat_enabled = enabled;
    }

    pub fn set_retention_ms(&mut self, retention_ms: i64) {
        self.processed.set_retention_ms(retention_ms);
    }
}
