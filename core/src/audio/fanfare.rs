//! Level-up fanfare parameter tables.
//!
//! A fanfare is a handful of oscillator voices, each a list of timed notes.
//! Nothing here produces samples; the frontend hands these parameters to the
//! browser's oscillators. The tables are fixed so the same level always
//! sounds the same.

use serde::{Deserialize, Serialize};

/// Levels that earn the extended fanfare.
pub const MILESTONE_LEVELS: [i32; 5] = [10, 25, 50, 75, 99];

/// Whether `level` is one of [`MILESTONE_LEVELS`].
pub fn is_milestone(level: i32) -> bool {
    MILESTONE_LEVELS.contains(&level)
}

/// Frequency of a MIDI note number in equal temperament (A4 = 69 = 440 Hz).
pub fn midi_to_hz(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanfareKind {
    /// Four ascending notes
    Arpeggio,
    /// Two voices, melody over a held harmony
    Milestone,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub frequency_hz: f32,
    /// Offset from the start of the fanfare
    pub start_secs: f32,
    pub duration_secs: f32,
    /// Peak gain before the output volume is applied, `0.0..=1.0`
    pub gain: f32,
}

impl Note {
    fn midi(note: u8, start_secs: f32, duration_secs: f32, gain: f32) -> Self {
        Self {
            frequency_hz: midi_to_hz(note),
            start_secs,
            duration_secs,
            gain,
        }
    }

    pub fn end_secs(&self) -> f32 {
        self.start_secs + self.duration_secs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub waveform: Waveform,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanfarePlan {
    pub kind: FanfareKind,
    pub voices: Vec<Voice>,
}

// MIDI note numbers
const C4: u8 = 60;
const E4: u8 = 64;
const G4: u8 = 67;
const C5: u8 = 72;
const E5: u8 = 76;
const G5: u8 = 79;
const C6: u8 = 84;

const ARPEGGIO_STEP_SECS: f32 = 0.11;

impl FanfarePlan {
    /// Pick the fanfare for a newly reached level.
    pub fn for_level(level: i32) -> Self {
        if is_milestone(level) {
            Self::milestone()
        } else {
            Self::arpeggio()
        }
    }

    pub fn arpeggio() -> Self {
        let notes = [C5, E5, G5, C6]
            .iter()
            .enumerate()
            .map(|(i, &note)| {
                let last = i == 3;
                Note::midi(
                    note,
                    i as f32 * ARPEGGIO_STEP_SECS,
                    if last { 0.35 } else { ARPEGGIO_STEP_SECS },
                    0.35,
                )
            })
            .collect();

        Self {
            kind: FanfareKind::Arpeggio,
            voices: vec![Voice {
                waveform: Waveform::Triangle,
                notes,
            }],
        }
    }

    pub fn milestone() -> Self {
        let melody = vec![
            Note::midi(G4, 0.00, 0.12, 0.35),
            Note::midi(C5, 0.12, 0.12, 0.35),
            Note::midi(E5, 0.24, 0.12, 0.35),
            Note::midi(G5, 0.36, 0.24, 0.38),
            Note::midi(E5, 0.60, 0.12, 0.35),
            Note::midi(G5, 0.72, 0.12, 0.38),
            Note::midi(C6, 0.84, 0.70, 0.40),
        ];
        let harmony = vec![
            Note::midi(C4, 0.00, 0.36, 0.15),
            Note::midi(E4, 0.36, 0.24, 0.15),
            Note::midi(G4, 0.60, 0.24, 0.15),
            Note::midi(C5, 0.84, 0.70, 0.18),
        ];

        Self {
            kind: FanfareKind::Milestone,
            voices: vec![
                Voice {
                    waveform: Waveform::Triangle,
                    notes: melody,
                },
                Voice {
                    waveform: Waveform::Square,
                    notes: harmony,
                },
            ],
        }
    }

    /// Time from the first note onset to the last note release.
    pub fn duration_secs(&self) -> f32 {
        self.notes().map(Note::end_secs).fold(0.0, f32::max)
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.voices.iter().flat_map(|v| v.notes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestones_are_exactly_the_fixed_set() {
        for level in -5..=200 {
            let expected = matches!(level, 10 | 25 | 50 | 75 | 99);
            assert_eq!(is_milestone(level), expected, "level {level}");
        }
        assert!(!is_milestone(0));
        assert!(!is_milestone(100));
        assert!(!is_milestone(i32::MIN));
    }

    #[test]
    fn a4_is_440() {
        assert!((midi_to_hz(69) - 440.0).abs() < 1e-3);
        assert!((midi_to_hz(C5) - 523.25).abs() < 0.01);
    }

    #[test]
    fn regular_level_gets_four_note_ascending_arpeggio() {
        let plan = FanfarePlan::for_level(11);
        assert_eq!(plan.kind, FanfareKind::Arpeggio);
        assert_eq!(plan.voices.len(), 1);

        let notes = &plan.voices[0].notes;
        assert_eq!(notes.len(), 4);
        assert!(notes.windows(2).all(|w| w[1].frequency_hz > w[0].frequency_hz));
        assert!(notes.windows(2).all(|w| w[1].start_secs > w[0].start_secs));
    }

    #[test]
    fn milestone_level_gets_two_voices() {
        for level in MILESTONE_LEVELS {
            let plan = FanfarePlan::for_level(level);
            assert_eq!(plan.kind, FanfareKind::Milestone);
            assert_eq!(plan.voices.len(), 2);
        }
        assert!(FanfarePlan::milestone().duration_secs() > FanfarePlan::arpeggio().duration_secs());
    }

    #[test]
    fn plans_are_deterministic() {
        assert_eq!(FanfarePlan::for_level(42), FanfarePlan::for_level(42));
        assert_eq!(FanfarePlan::for_level(99), FanfarePlan::for_level(99));
    }

    #[test]
    fn gains_stay_in_unit_range() {
        for plan in [FanfarePlan::arpeggio(), FanfarePlan::milestone()] {
            assert!(plan.notes().all(|n| n.gain > 0.0 && n.gain <= 1.0));
        }
    }
}
