//! Binds a [`LevelUpNotifier`] to an [`EventSource`].

use std::cell::RefCell;
use std::rc::Rc;

use skillhud_types::{LevelUpEvent, NotificationConfig};

use crate::events::{EventSource, GameSignal, SignalHandler, Subscription};

use super::{CapabilityProbe, LevelUpNotifier, SlotState};

/// A notifier together with its event subscription.
///
/// Incoming signals are buffered in an inbox and applied on the next call
/// into the feed, so a handler firing while the notifier is busy (e.g. a chat
/// backend that re-emits on the same bus) never loses an event.
pub struct LevelUpFeed {
    notifier: LevelUpNotifier,
    inbox: Rc<RefCell<Vec<GameSignal>>>,
    subscription: Option<Subscription>,
}

impl LevelUpFeed {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            notifier: LevelUpNotifier::new(config),
            inbox: Rc::new(RefCell::new(Vec::new())),
            subscription: None,
        }
    }

    /// Subscribe to `source`, replacing any previous subscription.
    pub fn attach(&mut self, source: &dyn EventSource) {
        // Tear down first so the old source stops delivering before the new
        // one starts.
        self.detach();

        let inbox = Rc::clone(&self.inbox);
        let subscription = source.subscribe(Box::new(move |signal: &GameSignal| {
            inbox.borrow_mut().push(signal.clone());
        }));
        self.subscription = Some(subscription);
        tracing::debug!("Level-up feed attached");
    }

    /// Unsubscribe from the current source, if any.
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!("Level-up feed detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    fn drain_inbox(&mut self) {
        let signals = std::mem::take(&mut *self.inbox.borrow_mut());
        for signal in &signals {
            self.notifier.handle_signal(signal);
        }
    }

    /// Apply buffered signals, then promote and dispatch.
    pub fn observe(&mut self, probe: &dyn CapabilityProbe) -> Option<&LevelUpEvent> {
        self.drain_inbox();
        self.notifier.observe(probe)
    }

    pub fn current(&self) -> Option<&LevelUpEvent> {
        self.notifier.current()
    }

    pub fn dismiss(&mut self) {
        self.notifier.dismiss();
    }

    pub fn tick(&mut self, now_ms: i64) -> usize {
        self.notifier.tick(now_ms)
    }

    pub fn state(&self) -> SlotState {
        self.notifier.state()
    }

    /// Items waiting to be shown, including signals not yet applied.
    pub fn pending_len(&self) -> usize {
        self.notifier.pending_len() + self.inbox.borrow().len()
    }

    pub fn apply_config(&mut self, config: &NotificationConfig) {
        self.notifier.apply_config(config);
    }

    pub fn notifier(&self) -> &LevelUpNotifier {
        &self.notifier
    }
}

impl Drop for LevelUpFeed {
    fn drop(&mut self) {
        self.detach();
    }
}
