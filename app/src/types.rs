//! Frontend type definitions
//!
//! Re-exports from skillhud-types shared with the native shell.

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports from skillhud-types (shared with the shell)
// ─────────────────────────────────────────────────────────────────────────────

pub use skillhud_types::{AppConfig, LevelUpPayload};
