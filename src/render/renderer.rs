//! Transcript projection for display
//!
//! Turns a stored message log into sanitized HTML blocks classified by
//! author. Only user messages and non-empty assistant messages are shown;
//! tool results and intermediate tool-call messages never render.

use serde::Serialize;

use crate::core::{Message, Role};
use crate::render::markdown::to_safe_html;

/// Display class of a rendered block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoleClass {
    /// Authored by the human
    User,
    /// Authored by the agent
    Bot,
}

impl std::fmt::Display for RoleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleClass::User => write!(f, "user-message"),
            RoleClass::Bot => write!(f, "bot-message"),
        }
    }
}

/// One display-ready block of the transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMessage {
    /// Which side of the conversation the block belongs to
    pub role_class: RoleClass,
    /// Sanitized HTML for the block
    pub html: String,
}

/// Project a stored message log into display blocks.
///
/// Pure function of the stored content: re-rendering the same log yields
/// byte-identical output.
pub fn render_history(messages: &[Message]) -> Vec<RenderedMessage> {
    messages
        .iter()
        .filter_map(|msg| match msg.role {
            Role::User => Some(RenderedMessage {
                role_class: RoleClass::User,
                html: to_safe_html(&msg.display_text()),
            }),
            Role::Assistant => {
                let text = msg.display_text();
                if text.is_empty() {
                    None
                } else {
                    Some(RenderedMessage {
                        role_class: RoleClass::Bot,
                        html: to_safe_html(&text),
                    })
                }
            }
            Role::Tool => None,
        })
        .collect()
}
