//! Agent module - orchestration and conversation state
//!
//! Contains the turn loop that coordinates model calls and tool execution,
//! the routing decision, and the conversation store.

pub mod orchestrator;
pub mod routing;
pub mod store;

pub use orchestrator::Agent;
pub use routing::{route, TurnAction};
pub use store::ConversationStore;
