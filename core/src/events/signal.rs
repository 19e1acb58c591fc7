use skillhud_types::{LevelUpEvent, LevelUpPayload};

/// Signals the HUD consumes from the game client.
///
/// Sources stamp events at receipt, so every signal carries a complete
/// [`LevelUpEvent`] even when the game omitted the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameSignal {
    /// A tracked skill's level increased
    SkillLevelUp(LevelUpEvent),
}

impl GameSignal {
    /// Wrap a raw payload, falling back to `received_at_ms` for the timestamp.
    pub fn level_up(payload: LevelUpPayload, received_at_ms: i64) -> Self {
        Self::SkillLevelUp(LevelUpEvent::from_payload(payload, received_at_ms))
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            Self::SkillLevelUp(event) => event.timestamp,
        }
    }
}
