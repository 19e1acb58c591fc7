pub mod audio;
pub mod config;
pub mod events;
pub mod notifications;
pub mod platform;

// Re-exports for convenience
pub use events::{EventSource, GameSignal, SignalBus, SignalHandler, Subscription};
pub use notifications::{
    AudioCapability, Capabilities, CapabilityError, CapabilityProbe, ChatCapability, LevelUpFeed,
    LevelUpNotifier, OutputChannel, SlotState,
};
pub use platform::{NoNativePlatform, PlatformError, PlatformServices};
pub use skillhud_types::{AppConfig, ChatMessage, LevelUpEvent, LevelUpPayload};

/// Wall-clock time in epoch milliseconds, the unit of every event timestamp.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
