//! Level-up popup.
//!
//! One popup at a time: further level-ups wait in the feed's queue and are
//! promoted when the current one is closed or times out. The first time an
//! item is shown, its fanfare and chat line fire through the feed's
//! dispatcher.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use skillhud_core::audio::is_milestone;
use skillhud_core::{
    AudioCapability, Capabilities, EventSource, GameSignal, LevelUpFeed, SignalBus, Subscription,
};
use skillhud_types::formatting::{display_skill_name, format_level_transition};
use skillhud_types::{LevelUpEvent, NotificationConfig};

use crate::audio::use_audio;
use crate::components::chat_panel::use_chat;

/// Shared level-up state.
///
/// The feed itself is not reactive; `revision` is bumped whenever it changes
/// and `shown` mirrors the item on screen.
#[derive(Clone)]
pub struct LevelUpState {
    feed: Rc<RefCell<LevelUpFeed>>,
    bus: SignalBus,
    revision: Signal<u64>,
    shown: Signal<Option<LevelUpEvent>>,
    popup_duration_ms: Signal<u32>,
    _tap: Rc<Subscription>,
}

impl LevelUpState {
    fn new(config: &NotificationConfig) -> Self {
        let bus = SignalBus::new();
        let mut feed = LevelUpFeed::new(config);
        feed.attach(&bus);

        let mut revision = Signal::new(0u64);
        let tap = bus.subscribe(Box::new(move |_signal: &GameSignal| {
            // The signal is gone once the app root unmounts.
            let _ = revision.try_write().map(|mut r| *r += 1);
        }));

        Self {
            feed: Rc::new(RefCell::new(feed)),
            bus,
            revision,
            shown: Signal::new(None),
            popup_duration_ms: Signal::new(config.popup_duration_ms),
            _tap: Rc::new(tap),
        }
    }

    /// Forward `source`'s signals into the feed until the returned
    /// subscription is dropped.
    pub fn connect(&self, source: &dyn EventSource) -> Subscription {
        let bus = self.bus.clone();
        source.subscribe(Box::new(move |signal: &GameSignal| bus.emit(signal)))
    }

    /// Deliver a signal as if it came from a connected source.
    pub fn emit(&self, signal: &GameSignal) {
        self.bus.emit(signal);
    }

    fn bump(&self) {
        let mut revision = self.revision;
        let _ = revision.try_write().map(|mut r| *r += 1);
    }

    /// Promote the next item if the slot is free and fire its side effects.
    fn observe(&self, probe: &Capabilities<'_>) {
        let current = self.feed.borrow_mut().observe(probe).cloned();
        let mut shown = self.shown;
        if *shown.peek() != current {
            shown.set(current);
        }
    }

    /// Close the popup on screen.
    pub fn dismiss(&self) {
        self.feed.borrow_mut().dismiss();
        self.bump();
    }

    /// Close the popup only if it still shows the event stamped `timestamp`.
    fn dismiss_if_current(&self, timestamp: i64) {
        let matches = self
            .feed
            .borrow()
            .current()
            .is_some_and(|e| e.timestamp == timestamp);
        if matches {
            self.dismiss();
        }
    }

    /// Advance the processed-timestamp sweep.
    pub fn tick(&self, now_ms: i64) -> usize {
        self.feed.borrow_mut().tick(now_ms)
    }

    pub fn apply_config(&self, config: &NotificationConfig) {
        self.feed.borrow_mut().apply_config(config);
        let mut duration = self.popup_duration_ms;
        duration.set(config.popup_duration_ms);
    }

    pub fn pending_len(&self) -> usize {
        self.feed.borrow().pending_len()
    }
}

/// Initialize level-up state at app root.
pub fn use_level_up_provider() -> LevelUpState {
    use_context_provider(|| LevelUpState::new(&NotificationConfig::default()))
}

pub fn use_level_up() -> LevelUpState {
    use_context::<LevelUpState>()
}

/// Popup for the level-up currently at the head of the queue.
///
/// Place this once in the main layout; it drives the queue.
#[component]
pub fn LevelUpPopup() -> Element {
    let state = use_level_up();
    let chat = use_chat();
    let audio = use_audio();

    // Observe whenever the feed changes
    {
        let state = state.clone();
        use_effect(move || {
            let _ = state.revision.read();
            let probe = Capabilities {
                audio: audio.as_ref().map(|a| a as &dyn AudioCapability),
                chat: Some(&chat),
            };
            state.observe(&probe);
        });
    }

    // Auto-dismiss after the configured duration
    {
        let state = state.clone();
        use_effect(move || {
            let Some(timestamp) = state.shown.read().as_ref().map(|e| e.timestamp) else {
                return;
            };
            let duration = *state.popup_duration_ms.peek();
            let state = state.clone();
            spawn(async move {
                TimeoutFuture::new(duration).await;
                state.dismiss_if_current(timestamp);
            });
        });
    }

    let Some(event) = state.shown.read().clone() else {
        return rsx! {};
    };

    let skill = display_skill_name(&event.skill);
    let transition = format_level_transition(event.old_level, event.new_level);
    let class = if is_milestone(event.new_level) {
        "level-up-popup level-up-milestone"
    } else {
        "level-up-popup"
    };
    let waiting = state.pending_len();

    rsx! {
        div { class: "{class}",
            div { class: "level-up-title", "Level up!" }
            div { class: "level-up-skill", "{skill}" }
            div { class: "level-up-levels", "{transition}" }
            if waiting > 0 {
                div { class: "level-up-waiting", "+{waiting} more" }
            }
            button {
                class: "level-up-close",
                onclick: move |_| state.dismiss(),
                "X"
            }
        }
    }
}
