//! Render module - transcript display pipeline
//!
//! Flattens stored messages and renders them into a safe HTML subset.

pub mod markdown;
pub mod renderer;

pub use markdown::to_safe_html;
pub use renderer::{render_history, RenderedMessage, RoleClass};
