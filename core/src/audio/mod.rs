//! Audio cues for HUD notifications.
//!
//! [`fanfare`] holds the parameter tables; playback lives with whatever
//! audio backend implements
//! [`AudioCapability`](crate::notifications::AudioCapability).

pub mod fanfare;

pub use fanfare::{FanfareKind, FanfarePlan, MILESTONE_LEVELS, Note, Voice, Waveform, is_milestone};
