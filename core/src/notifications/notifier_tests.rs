//! Tests for the level-up notifier
//!
//! Covers queue order through the notifier, fire-once dispatch, capability
//! failures and the processed-set purge cadence.

use std::cell::RefCell;

use skillhud_types::{ChatKind, ChatMessage, LevelUpEvent, NotificationConfig};

use super::{
    AudioCapability, Capabilities, CapabilityError, ChatCapability, LevelUpFeed, LevelUpNotifier,
    NoCapabilities, OutputChannel, SlotState,
};
use crate::audio::{FanfareKind, FanfarePlan};
use crate::events::{GameSignal, SignalBus, SignalHandler};

fn make_event(skill: &str, old_level: i32, new_level: i32, timestamp: i64) -> LevelUpEvent {
    LevelUpEvent::new(skill, old_level, new_level, timestamp)
}

#[derive(Default)]
struct FakeAudio {
    gain: f32,
    fail: bool,
    plays: RefCell<Vec<(i32, OutputChannel)>>,
}

impl FakeAudio {
    fn with_gain(gain: f32) -> Self {
        Self {
            gain,
            ..Default::default()
        }
    }
}

impl AudioCapability for FakeAudio {
    fn effective_gain(&self) -> f32 {
        self.gain
    }

    fn play_when_ready(&self, level: i32, output: OutputChannel) -> Result<(), CapabilityError> {
        self.plays.borrow_mut().push((level, output));
        if self.fail {
            return Err(CapabilityError::NotReady("audio context suspended".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeChat {
    fail: bool,
    lines: RefCell<Vec<(ChatMessage, bool)>>,
}

impl ChatCapability for FakeChat {
    fn append(&self, message: ChatMessage, broadcast: bool) -> Result<(), CapabilityError> {
        self.lines.borrow_mut().push((message, broadcast));
        if self.fail {
            return Err(CapabilityError::Failed("chat store closed".into()));
        }
        Ok(())
    }
}

fn caps<'a>(audio: &'a FakeAudio, chat: &'a FakeChat) -> Capabilities<'a> {
    Capabilities {
        audio: Some(audio),
        chat: Some(chat),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// End-to-end
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn woodcutting_milestone_end_to_end() {
    let audio = FakeAudio::with_gain(0.8);
    let chat = FakeChat::default();
    let mut notifier = LevelUpNotifier::default();

    let first = make_event("woodcutting", 9, 10, 1000);
    let second = make_event("fishing", 3, 4, 1001);
    notifier.enqueue(first.clone());
    notifier.enqueue(second.clone());

    assert_eq!(notifier.observe(&caps(&audio, &chat)), Some(&first));
    assert_eq!(notifier.state(), SlotState::Showing);

    let lines = chat.lines.borrow();
    assert_eq!(lines.len(), 1);
    let (message, broadcast) = &lines[0];
    assert_eq!(
        message.text,
        "Congratulations! You've advanced a Woodcutting level. You are now level 10."
    );
    assert_eq!(message.sender, None);
    assert_eq!(message.kind, ChatKind::System);
    assert!(!broadcast);
    drop(lines);

    assert_eq!(*audio.plays.borrow(), vec![(10, OutputChannel::Effects)]);
    assert_eq!(FanfarePlan::for_level(10).kind, FanfareKind::Milestone);
    assert_eq!(
        notifier.last_report().and_then(|r| r.fanfare),
        Some(FanfareKind::Milestone)
    );

    notifier.dismiss();
    assert_eq!(notifier.current(), None);
    assert_eq!(notifier.state(), SlotState::Idle);

    assert_eq!(notifier.observe(&caps(&audio, &chat)), Some(&second));
    assert_eq!(
        notifier.last_report().and_then(|r| r.fanfare),
        Some(FanfareKind::Arpeggio)
    );
    assert_eq!(chat.lines.borrow().len(), 2);
}

#[test]
fn fifo_order_through_notifier() {
    let mut notifier = LevelUpNotifier::default();
    let events: Vec<_> = (0..5)
        .map(|i| make_event("mining", 10 + i, 11 + i, 100 + i as i64))
        .collect();
    for e in &events {
        notifier.enqueue(e.clone());
    }

    let mut shown = Vec::new();
    while let Some(current) = notifier.observe(&NoCapabilities) {
        shown.push(current.clone());
        notifier.dismiss();
    }
    assert_eq!(shown, events);
    assert_eq!(notifier.pending_len(), 0);
}

#[test]
fn dismiss_on_idle_does_not_promote() {
    let mut notifier = LevelUpNotifier::default();
    notifier.dismiss();
    assert_eq!(notifier.current(), None);
    assert_eq!(notifier.observe(&NoCapabilities), None);

    notifier.enqueue(make_event("mining", 1, 2, 5));
    notifier.dismiss();
    assert_eq!(notifier.current(), None);
    assert_eq!(notifier.pending_len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// At-most-once dispatch
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn repeated_observation_dispatches_once() {
    let audio = FakeAudio::with_gain(1.0);
    let chat = FakeChat::default();
    let mut notifier = LevelUpNotifier::default();
    notifier.enqueue(make_event("mining", 1, 2, 42));

    for _ in 0..5 {
        notifier.observe(&caps(&audio, &chat));
    }
    assert_eq!(audio.plays.borrow().len(), 1);
    assert_eq!(chat.lines.borrow().len(), 1);
}

#[test]
fn same_timestamp_delivered_twice_dispatches_once() {
    let audio = FakeAudio::with_gain(1.0);
    let chat = FakeChat::default();
    let mut notifier = LevelUpNotifier::default();

    // simulates a re-subscription replaying the same event
    notifier.enqueue(make_event("mining", 1, 2, 42));
    notifier.enqueue(make_event("mining", 1, 2, 42));

    notifier.observe(&caps(&audio, &chat));
    notifier.dismiss();
    let replay = notifier.observe(&caps(&audio, &chat)).cloned();

    // the duplicate is still shown, only its side effects are suppressed
    assert_eq!(replay.map(|e| e.timestamp), Some(42));
    assert_eq!(audio.plays.borrow().len(), 1);
    assert_eq!(chat.lines.borrow().len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Capability presence and failure
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn muted_audio_skips_fanfare_but_still_chats() {
    let audio = FakeAudio::with_gain(0.0);
    let chat = FakeChat::default();
    let mut notifier = LevelUpNotifier::default();
    notifier.enqueue(make_event("mining", 24, 25, 1));

    notifier.observe(&caps(&audio, &chat));
    assert!(audio.plays.borrow().is_empty());
    assert_eq!(chat.lines.borrow().len(), 1);
    assert_eq!(notifier.last_report().and_then(|r| r.fanfare), None);
}

#[test]
fn missing_capabilities_are_silent() {
    let chat = FakeChat::default();
    let mut notifier = LevelUpNotifier::default();
    notifier.enqueue(make_event("mining", 1, 2, 1));

    let only_chat = Capabilities {
        audio: None,
        chat: Some(&chat),
    };
    assert!(notifier.observe(&only_chat).is_some());
    assert_eq!(chat.lines.borrow().len(), 1);
    assert!(notifier.is_processed(1));
}

#[test]
fn failing_capabilities_do_not_stall_queue() {
    let audio = FakeAudio {
        gain: 1.0,
        fail: true,
        ..Default::default()
    };
    let chat = FakeChat {
        fail: true,
        ..Default::default()
    };
    let mut notifier = LevelUpNotifier::default();
    notifier.enqueue(make_event("mining", 1, 2, 1));
    notifier.enqueue(make_event("mining", 2, 3, 2));

    assert_eq!(notifier.observe(&caps(&audio, &chat)).map(|e| e.timestamp), Some(1));
    let report = notifier.last_report().unwrap();
    assert_eq!(report.fanfare, None);
    assert!(!report.chat);
    // failed attempts still count as dispatched
    assert!(notifier.is_processed(1));

    notifier.dismiss();
    assert_eq!(notifier.observe(&caps(&audio, &chat)).map(|e| e.timestamp), Some(2));
    assert_eq!(audio.plays.borrow().len(), 2);
}

#[test]
fn chat_lines_can_be_disabled_by_config() {
    let audio = FakeAudio::with_gain(1.0);
    let chat = FakeChat::default();
    let config = NotificationConfig {
        chat_messages: false,
        ..Default::default()
    };
    let mut notifier = LevelUpNotifier::new(&config);
    notifier.enqueue(make_event("mining", 1, 2, 1));

    notifier.observe(&caps(&audio, &chat));
    assert!(chat.lines.borrow().is_empty());
    assert_eq!(audio.plays.borrow().len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Retention and purge cadence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn redelivery_after_purge_dispatches_again() {
    let audio = FakeAudio::with_gain(1.0);
    let chat = FakeChat::default();
    let mut notifier = LevelUpNotifier::default();

    notifier.enqueue(make_event("mining", 1, 2, 1000));
    notifier.observe(&caps(&audio, &chat));
    notifier.dismiss();

    // inside the 60s window: still suppressed
    assert_eq!(notifier.purge(1000 + 59_000), 0);
    notifier.enqueue(make_event("mining", 1, 2, 1000));
    notifier.observe(&caps(&audio, &chat));
    notifier.dismiss();
    assert_eq!(chat.lines.borrow().len(), 1);

    // past the window: forgotten, so the replay counts as a new event
    assert_eq!(notifier.purge(1000 + 61_000), 1);
    notifier.enqueue(make_event("mining", 1, 2, 1000));
    notifier.observe(&caps(&audio, &chat));
    assert_eq!(chat.lines.borrow().len(), 2);
    assert_eq!(audio.plays.borrow().len(), 2);
}

#[test]
fn applied_config_changes_retention_window() {
    let mut notifier = LevelUpNotifier::default();
    notifier.apply_config(&NotificationConfig {
        retention_ms: 1_000,
        ..Default::default()
    });

    notifier.enqueue(make_event("mining", 1, 2, 0));
    notifier.observe(&NoCapabilities);
    assert!(notifier.is_processed(0));

    // the 60s default would have kept it
    assert_eq!(notifier.purge(5_000), 1);
    assert!(!notifier.is_processed(0));
}

#[test]
fn tick_purges_on_thirty_second_cadence() {
    let mut notifier = LevelUpNotifier::default();
    notifier.enqueue(make_event("mining", 1, 2, 0));
    notifier.observe(&NoCapabilities);
    assert_eq!(notifier.processed_len(), 1);

    // first tick starts the cadence
    assert_eq!(notifier.tick(70_000), 0);
    // not due yet
    assert_eq!(notifier.tick(80_000), 0);
    assert_eq!(notifier.processed_len(), 1);
    // due
    assert_eq!(notifier.tick(100_000), 1);
    assert_eq!(notifier.processed_len(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Signals and feed
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn handle_signal_enqueues() {
    let mut notifier = LevelUpNotifier::default();
    notifier.handle_signal(&GameSignal::SkillLevelUp(make_event("mining", 1, 2, 7)));
    assert_eq!(notifier.pending_len(), 1);
    assert_eq!(notifier.current(), None);
}

#[test]
fn feed_receives_from_bus_and_detaches() {
    let bus = SignalBus::new();
    let mut feed = LevelUpFeed::new(&NotificationConfig::default());
    feed.attach(&bus);
    assert!(feed.is_attached());
    assert_eq!(bus.subscriber_count(), 1);

    bus.emit(&GameSignal::SkillLevelUp(make_event("mining", 1, 2, 1)));
    assert_eq!(feed.pending_len(), 1);
    assert_eq!(feed.observe(&NoCapabilities).map(|e| e.timestamp), Some(1));

    feed.detach();
    assert_eq!(bus.subscriber_count(), 0);
    bus.emit(&GameSignal::SkillLevelUp(make_event("mining", 2, 3, 2)));
    feed.dismiss();
    assert_eq!(feed.observe(&NoCapabilities), None);
}

#[test]
fn feed_reattach_switches_source() {
    let old_bus = SignalBus::new();
    let new_bus = SignalBus::new();
    let mut feed = LevelUpFeed::new(&NotificationConfig::default());

    feed.attach(&old_bus);
    feed.attach(&new_bus);
    assert_eq!(old_bus.subscriber_count(), 0);
    assert_eq!(new_bus.subscriber_count(), 1);

    old_bus.emit(&GameSignal::SkillLevelUp(make_event("mining", 1, 2, 1)));
    new_bus.emit(&GameSignal::SkillLevelUp(make_event("fishing", 1, 2, 2)));
    assert_eq!(feed.observe(&NoCapabilities).map(|e| e.skill.as_str()), Some("fishing"));
}

#[test]
fn dropping_feed_unsubscribes() {
    let bus = SignalBus::new();
    {
        let mut feed = LevelUpFeed::new(&NotificationConfig::default());
        feed.attach(&bus);
        assert_eq!(bus.subscriber_count(), 1);
    }
    assert_eq!(bus.subscriber_count(), 0);
}
