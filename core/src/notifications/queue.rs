//! FIFO of level-ups waiting for the popup, plus the single "current" slot.

use std::collections::VecDeque;

use skillhud_types::LevelUpEvent;

/// Whether the popup slot is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Nothing on screen. The queue may still hold items.
    Idle,
    /// Exactly one item on screen.
    Showing,
}

/// Arrival-ordered buffer with one item extracted for display at a time.
///
/// The deque holds only items that have not been shown yet. An item moves
/// into the current slot on observation, never on enqueue or dismiss.
#[derive(Debug, Clone, Default)]
pub struct LevelUpQueue {
    pending: VecDeque<LevelUpEvent>,
    current: Option<LevelUpEvent>,
}

impl LevelUpQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail. No de-duplication, no capacity limit.
    pub fn enqueue(&mut self, event: LevelUpEvent) {
        self.pending.push_back(event);
    }

    /// The item on screen, without promoting anything.
    pub fn current(&self) -> Option<&LevelUpEvent> {
        self.current.as_ref()
    }

    /// The item on screen, promoting the queue head first if the slot is empty.
    pub fn current_or_promote(&mut self) -> Option<&LevelUpEvent> {
        if self.current.is_none()
            && let Some(next) = self.pending.pop_front()
        {
            tracing::debug!(
                skill = %next.skill,
                level = next.new_level,
                remaining = self.pending.len(),
                "Promoted level-up to current"
            );
            self.current = Some(next);
        }
        self.current.as_ref()
    }

    /// Clear the current slot. Harmless when nothing is showing.
    pub fn dismiss(&mut self) {
        if let Some(dismissed) = self.current.take() {
            tracing::debug!(skill = %dismissed.skill, level = dismissed.new_level, "Dismissed level-up");
        }
    }

    pub fn state(&self) -> SlotState {
        if self.current.is_some() {
            SlotState::Showing
        } else {
            SlotState::Idle
        }
    }

    /// Items waiting behind the current one.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.current.is_none()
    }
}
