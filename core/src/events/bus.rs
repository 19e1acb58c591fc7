//! In-process signal bus and the subscription handle shared by every
//! event source.
//!
//! Everything here is single-threaded: handlers run synchronously on the
//! thread that calls [`SignalBus::emit`].

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::GameSignal;

/// Callback registered with an [`EventSource`].
pub type SignalCallback = Box<dyn FnMut(&GameSignal)>;

/// Something the HUD can subscribe to for game signals.
///
/// Implemented by [`SignalBus`] for in-process use and by the frontend's
/// native-shell listener.
pub trait EventSource {
    /// Register `handler`. The handler stays registered until the returned
    /// [`Subscription`] is dropped.
    fn subscribe(&self, handler: SignalCallback) -> Subscription;
}

/// Registration guard. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// A subscription with nothing to tear down.
    pub fn noop() -> Self {
        Self { unsubscribe: None }
    }

    /// Unsubscribe now. Same as dropping, but reads better at call sites.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

type SharedCallback = Rc<RefCell<SignalCallback>>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    handlers: Vec<(u64, SharedCallback)>,
}

/// Synchronous fan-out of [`GameSignal`]s to registered handlers.
///
/// Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct SignalBus {
    inner: Rc<RefCell<BusInner>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `signal` to every handler registered at the time of the call.
    ///
    /// Handlers may subscribe, unsubscribe or emit from inside their callback.
    /// A handler that is already running (re-entrant emit) is skipped for
    /// the nested signal.
    pub fn emit(&self, signal: &GameSignal) {
        let handlers: Vec<SharedCallback> = self
            .inner
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut callback) => (&mut **callback)(signal),
                Err(_) => {
                    tracing::warn!(?signal, "Skipping re-entrant delivery to a busy handler");
                }
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }
}

impl EventSource for SignalBus {
    fn subscribe(&self, handler: SignalCallback) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.handlers.push((id, Rc::new(RefCell::new(handler))));
            id
        };

        let weak: Weak<RefCell<BusInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().handlers.retain(|(other, _)| *other != id);
            }
        })
    }
}

impl fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillhud_types::LevelUpEvent;

    fn level_up(ts: i64) -> GameSignal {
        GameSignal::SkillLevelUp(LevelUpEvent::new("mining", 1, 2, ts))
    }

    fn recorder() -> (Rc<RefCell<Vec<i64>>>, SignalCallback) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, Box::new(move |s: &GameSignal| sink.borrow_mut().push(s.timestamp())))
    }

    #[test]
    fn emit_reaches_all_subscribers() {
        let bus = SignalBus::new();
        let (a, handler_a) = recorder();
        let (b, handler_b) = recorder();
        let _sub_a = bus.subscribe(handler_a);
        let _sub_b = bus.subscribe(handler_b);

        bus.emit(&level_up(1));
        bus.emit(&level_up(2));

        assert_eq!(*a.borrow(), vec![1, 2]);
        assert_eq!(*b.borrow(), vec![1, 2]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus = SignalBus::new();
        let (seen, handler) = recorder();
        let sub = bus.subscribe(handler);
        assert_eq!(bus.subscriber_count(), 1);

        bus.emit(&level_up(1));
        sub.cancel();
        bus.emit(&level_up(2));

        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn subscription_outliving_bus_is_harmless() {
        let bus = SignalBus::new();
        let (_, handler) = recorder();
        let sub = bus.subscribe(handler);
        drop(bus);
        drop(sub);
    }

    #[test]
    fn handler_may_emit_without_deadlock() {
        let bus = SignalBus::new();
        let (seen, handler) = recorder();
        let _sub = bus.subscribe(handler);

        let relay_bus = bus.clone();
        let _relay = bus.subscribe(Box::new(move |s: &GameSignal| {
            if s.timestamp() == 1 {
                relay_bus.emit(&level_up(2));
            }
        }));

        bus.emit(&level_up(1));
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }
}
