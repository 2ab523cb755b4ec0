//! CLI commands
//!
//! Special commands that can be executed in the chat REPL.

use crate::agent::Agent;
use crate::core::Result;

/// Result of parsing a command
pub enum CommandResult {
    /// Continue processing as normal input
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Exit the REPL
    Exit,
    /// Clear the current conversation
    Clear,
}

/// Parse and handle special commands
pub fn handle_command(input: &str, agent: &Agent, conversation_id: &str) -> Result<CommandResult> {
    let input = input.trim();
    let cmd = input.split_whitespace().next().unwrap_or("").to_lowercase();

    match cmd.as_str() {
        "exit" | "quit" | "q" => Ok(CommandResult::Exit),

        "clear" | "reset" => Ok(CommandResult::Clear),

        "help" | "?" => Ok(CommandResult::Handled(help_text())),

        "history" => {
            let rendered = agent.rendered_history(conversation_id);
            if rendered.is_empty() {
                return Ok(CommandResult::Handled("No messages yet.".to_string()));
            }
            let output = rendered
                .iter()
                .map(|m| format!("[{}]\n{}", m.role_class, m.html))
                .collect::<Vec<_>>()
                .join("\n\n");
            Ok(CommandResult::Handled(output))
        }

        "status" => {
            let status = format!(
                "Confab Status:\n\
                 ─────────────────────────────\n\
                 Model:        {}\n\
                 Conversation: {}\n\
                 Messages:     {}\n\
                 Max rounds:   {}",
                agent.config().model.name,
                conversation_id,
                agent.store().len(conversation_id),
                agent.config().agent.max_rounds,
            );
            Ok(CommandResult::Handled(status))
        }

        _ => {
            // Not a command, treat as normal input
            if input.starts_with('/') {
                Ok(CommandResult::Handled(format!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    cmd
                )))
            } else {
                Ok(CommandResult::Continue(input.to_string()))
            }
        }
    }
}

/// Generate help text
fn help_text() -> String {
    r#"Confab Commands:
─────────────────────────────────────────────
  help, ?          Show this help message
  exit, quit, q    Exit Confab
  clear, reset     Clear the current conversation
  history          Show the rendered transcript
  status           Show current configuration

Keyboard Shortcuts:
  Ctrl+C           Cancel current operation
  Ctrl+D           Exit Confab
─────────────────────────────────────────────"#
        .to_string()
}
