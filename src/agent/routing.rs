//! Routing decision for the agent loop
//!
//! Pure function of the latest assistant message: either dispatch the
//! requested tool calls or terminate the turn with the answer.

use crate::core::{Message, ToolCall};

/// Next action for the orchestration loop
#[derive(Debug, Clone, PartialEq)]
pub enum TurnAction {
    /// Dispatch these tool calls and loop back to the model
    Continue(Vec<ToolCall>),
    /// Terminate the turn with the final answer text
    Finish(String),
}

/// Decide what the loop does with the latest assistant message.
///
/// A present-but-empty `tool_calls` list terminates the turn; the loop
/// never continues on an ambiguous signal.
pub fn route(message: &Message) -> TurnAction {
    let calls = message.tool_calls();
    if calls.is_empty() {
        TurnAction::Finish(message.display_text())
    } else {
        TurnAction::Continue(calls.to_vec())
    }
}
