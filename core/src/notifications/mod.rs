//! Level-up notification pipeline
//!
//! ```text
//!  EventSource ──GameSignal::SkillLevelUp──▶ LevelUpQueue (FIFO)
//!                                               │ observe(): promote head
//!                                               ▼
//!                                         current item ──▶ popup
//!                                               │ first observation only
//!                                               ▼
//!                                   SideEffectDispatcher ──▶ audio / chat
//!                                               │
//!                                               ▼
//!                                   ProcessedSet (purged every 30s)
//! ```
//!
//! Everything runs on the UI thread. The dispatcher never feeds back into
//! the queue, so a failing capability cannot stall the popup.

mod dispatcher;
mod feed;
mod notifier;
mod processed;
mod queue;

#[cfg(test)]
mod notifier_tests;

pub use dispatcher::{
    AudioCapability, Capabilities, CapabilityError, CapabilityProbe, ChatCapability,
    DispatchReport, NoCapabilities, OutputChannel, SideEffectDispatcher,
};
pub use feed::LevelUpFeed;
pub use notifier::LevelUpNotifier;
pub use processed::ProcessedSet;
pub use queue::{LevelUpQueue, SlotState};
