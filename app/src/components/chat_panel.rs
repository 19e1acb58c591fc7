//! In-game chat log.
//!
//! The log is a context-provided signal so any component (and the level-up
//! dispatcher, through [`ChatCapability`]) can append lines.

use dioxus::prelude::*;
use skillhud_core::{CapabilityError, ChatCapability};
use skillhud_types::{ChatKind, ChatMessage};

/// Oldest lines are dropped beyond this.
const MAX_LINES: usize = 200;

/// Shared chat log.
///
/// Access via `use_chat()` from any component.
#[derive(Clone, Copy)]
pub struct ChatLog {
    lines: Signal<Vec<ChatMessage>>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self {
            lines: Signal::new(vec![]),
        }
    }

    /// Append a line locally, capping the log at [`MAX_LINES`].
    pub fn push(&self, message: ChatMessage) {
        let mut lines = self.lines;
        let mut lines = lines.write();
        if lines.len() >= MAX_LINES {
            let excess = lines.len() + 1 - MAX_LINES;
            lines.drain(..excess);
        }
        lines.push(message);
    }

    pub fn clear(&mut self) {
        self.lines.write().clear();
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatCapability for ChatLog {
    fn append(&self, message: ChatMessage, broadcast: bool) -> Result<(), CapabilityError> {
        // There is no chat server connection, so only local lines are possible.
        if broadcast {
            return Err(CapabilityError::NotReady(
                "not connected to a chat server".to_string(),
            ));
        }
        self.push(message);
        Ok(())
    }
}

/// Initialize the chat log at app root.
pub fn use_chat_provider() -> ChatLog {
    use_context_provider(ChatLog::new)
}

/// Get the chat log from context.
pub fn use_chat() -> ChatLog {
    use_context::<ChatLog>()
}

#[component]
pub fn ChatPanel() -> Element {
    let chat = use_chat();
    let lines = chat.lines.read();

    rsx! {
        div { class: "chat-panel",
            if lines.is_empty() {
                div { class: "chat-empty", "No messages yet" }
            }
            for (i, line) in lines.iter().enumerate() {
                div {
                    key: "{line.timestamp}-{i}",
                    class: match line.kind {
                        ChatKind::System => "chat-line chat-system",
                        ChatKind::Player => "chat-line",
                    },
                    if let Some(sender) = &line.sender {
                        span { class: "chat-sender", "{sender}: " }
                    }
                    span { class: "chat-text", "{line.text}" }
                }
            }
        }
    }
}
