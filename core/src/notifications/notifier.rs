//! Level-up notification state for one popup slot.

use skillhud_types::{LevelUpEvent, NotificationConfig};

use crate::events::{GameSignal, SignalHandler};

use super::{CapabilityProbe, DispatchReport, LevelUpQueue, SideEffectDispatcher, SlotState};

/// Queue, dismissal and fire-once side effects for one notification slot.
///
/// Feed it signals (or [`enqueue`](Self::enqueue) directly), call
/// [`observe`](Self::observe) whenever the presentation layer renders, and
/// [`dismiss`](Self::dismiss) when the user or the popup timer is done with
/// the current item. [`tick`](Self::tick) keeps the processed set bounded.
#[derive(Debug, Clone)]
pub struct LevelUpNotifier {
    queue: LevelUpQueue,
    dispatcher: SideEffectDispatcher,
    purge_interval_ms: i64,
    last_purge_ms: Option<i64>,
    last_report: Option<DispatchReport>,
}

impl LevelUpNotifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            queue: LevelUpQueue::new(),
            dispatcher: SideEffectDispatcher::new(config.retention_ms, config.chat_messages),
            purge_interval_ms: config.purge_interval_ms,
            last_purge_ms: None,
            last_report: None,
        }
    }

    pub fn enqueue(&mut self, event: LevelUpEvent) {
        tracing::debug!(skill = %event.skill, level = event.new_level, "Queued level-up");
        self.queue.enqueue(event);
    }

    /// Read-only snapshot of the item on screen.
    pub fn current(&self) -> Option<&LevelUpEvent> {
        self.queue.current()
    }

    /// Promote the next item if the slot is free and fire its side effects
    /// the first time it is seen. Returns the item on screen.
    pub fn observe(&mut self, probe: &dyn CapabilityProbe) -> Option<&LevelUpEvent> {
        let current = self.queue.current_or_promote()?;
        if let Some(report) = self.dispatcher.dispatch(current, probe) {
            self.last_report = Some(report);
        }
        Some(current)
    }

    /// Clear the item on screen. The next [`observe`](Self::observe) promotes.
    pub fn dismiss(&mut self) {
        self.queue.dismiss();
    }

    pub fn state(&self) -> SlotState {
        self.queue.state()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.pending_len()
    }

    /// Outcome of the most recent side-effect dispatch.
    pub fn last_report(&self) -> Option<DispatchReport> {
        self.last_report
    }

    pub fn is_processed(&self, timestamp: i64) -> bool {
        self.dispatcher.is_processed(timestamp)
    }

    pub fn processed_len(&self) -> usize {
        self.dispatcher.processed_len()
    }

    /// Run the periodic purge if one is due at `now_ms`.
    ///
    /// The first tick only starts the cadence. Returns the number of
    /// processed timestamps forgotten.
    pub fn tick(&mut self, now_ms: i64) -> usize {
        match self.last_purge_ms {
            Some(last) if now_ms.saturating_sub(last) >= self.purge_interval_ms => {
                self.last_purge_ms = Some(now_ms);
                self.purge(now_ms)
            }
            Some(_) => 0,
            None => {
                self.last_purge_ms = Some(now_ms);
                0
            }
        }
    }

    /// Forget processed timestamps older than the retention window.
    pub fn purge(&mut self, now_ms: i64) -> usize {
        let removed = self.dispatcher.purge(now_ms);
        if removed > 0 {
            tracing::debug!(removed, "Purged processed level-up timestamps");
        }
        removed
    }

    pub fn apply_config(&mut self, config: &NotificationConfig) {
        self.dispatcher.set_chat_enabled(config.chat_messages);
        self.dispatcher.set_retention_ms(config.retention_ms);
        self.purge_interval_ms = config.purge_interval_ms;
    }
}

impl Default for LevelUpNotifier {
    fn default() -> Self {
        Self::new(&NotificationConfig::default())
    }
}

impl SignalHandler for LevelUpNotifier {
    fn handle_signal(&mut self, signal: &GameSignal) {
        match signal {
            GameSignal::SkillLevelUp(event) => self.enqueue(event.clone()),
        }
    }
}
