//! CLI module - command handling and the chat REPL

pub mod commands;
pub mod repl;

pub use repl::Repl;
