//! UI Components

pub mod chat_panel;
pub mod level_up_popup;
pub mod sign_in;

pub use chat_panel::{ChatLog, ChatPanel, use_chat, use_chat_provider};
pub use level_up_popup::{LevelUpPopup, LevelUpState, use_level_up, use_level_up_provider};
pub use sign_in::SignIn;
