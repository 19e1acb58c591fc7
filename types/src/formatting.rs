//! Centralized skill and level text formatting.
//!
//! All user-facing skill names go through this module so the popup, the chat
//! line and any tooltip agree on spelling. Skill identifiers arrive from the
//! game in whatever case the event source uses ("Hit Points", "WOODCUTTING",
//! "hitpoints"), so everything is normalized before it is displayed.

/// Normalize a skill identifier: lowercase and strip all whitespace.
///
/// # Examples
/// ```
/// use skillhud_types::formatting::normalize_skill_name;
/// assert_eq!(normalize_skill_name("Hit Points"), "hitpoints");
/// assert_eq!(normalize_skill_name("  Wood Cutting "), "woodcutting");
/// assert_eq!(normalize_skill_name("MINING"), "mining");
/// ```
pub fn normalize_skill_name(skill: &str) -> String {
    skill
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Uppercase the first character, leaving the rest untouched.
///
/// # Examples
/// ```
/// use skillhud_types::formatting::capitalize;
/// assert_eq!(capitalize("woodcutting"), "Woodcutting");
/// assert_eq!(capitalize(""), "");
/// assert_eq!(capitalize("é"), "É");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display form of a skill: normalized, then capitalized.
///
/// # Examples
/// ```
/// use skillhud_types::formatting::display_skill_name;
/// assert_eq!(display_skill_name("Hit Points"), "Hitpoints");
/// assert_eq!(display_skill_name("woodcutting"), "Woodcutting");
/// ```
#[inline]
pub fn display_skill_name(skill: &str) -> String {
    capitalize(&normalize_skill_name(skill))
}

/// The system chat line announced on a level-up.
///
/// # Examples
/// ```
/// use skillhud_types::formatting::format_level_up_message;
/// assert_eq!(
///     format_level_up_message("woodcutting", 10),
///     "Congratulations! You've advanced a Woodcutting level. You are now level 10."
/// );
/// ```
pub fn format_level_up_message(skill: &str, new_level: i32) -> String {
    format!(
        "Congratulations! You've advanced a {} level. You are now level {}.",
        display_skill_name(skill),
        new_level
    )
}

/// Short `old → new` label for the popup subtitle.
///
/// Multi-level jumps (e.g. quest rewards) still render as a single arrow.
///
/// # Examples
/// ```
/// use skillhud_types::formatting::format_level_transition;
/// assert_eq!(format_level_transition(9, 10), "9 → 10");
/// assert_eq!(format_level_transition(40, 43), "40 → 43");
/// ```
pub fn format_level_transition(old_level: i32, new_level: i32) -> String {
    format!("{} → {}", old_level, new_level)
}
