//! Interactive chat REPL for Confab
//!
//! Provides the main user interaction loop. Each REPL session gets a
//! fresh conversation id; `clear` resets it in place.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use uuid::Uuid;

use crate::agent::Agent;
use crate::cli::commands::{handle_command, CommandResult};
use crate::core::Result;

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    agent: Arc<Agent>,
    conversation_id: String,
}

impl Repl {
    /// Create a REPL around a constructed agent
    pub fn new(agent: Arc<Agent>) -> Self {
        Self {
            agent,
            conversation_id: Uuid::new_v4().to_string(),
        }
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("You: ");
            stdout.flush()?;

            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    // EOF (Ctrl+D)
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            }

            let input = input.trim();

            if input.is_empty() {
                continue;
            }

            match handle_command(input, &self.agent, &self.conversation_id) {
                Ok(CommandResult::Exit) => {
                    println!("\nGoodbye!");
                    break;
                }
                Ok(CommandResult::Clear) => {
                    self.agent.reset(&self.conversation_id);
                    self.conversation_id = Uuid::new_v4().to_string();
                    println!("Conversation cleared.\n");
                    continue;
                }
                Ok(CommandResult::Handled(output)) => {
                    println!("{}\n", output);
                    continue;
                }
                Ok(CommandResult::Continue(input)) => {
                    match self.agent.submit_turn(&self.conversation_id, &input).await {
                        Ok(answer) => {
                            println!("\nAssistant:\n{}\n", answer);
                        }
                        Err(e) => {
                            eprintln!("\nError: {}\n", e);
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Command error: {}\n", e);
                }
            }
        }

        Ok(())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        let config = self.agent.config();

        println!("Confab - Conversational Agent");
        println!("Model:    {}", config.model.name);
        println!("Corpus:   {}", config.retrieval.corpus_dir.display());
        println!();
        println!("Commands: help, history, clear, status, exit");
        println!("─────────────────────────────────────────────");
    }
}
