//! Agent orchestrator
//!
//! Drives the model/tool alternation loop for one turn at a time and
//! projects stored transcripts for display.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::agent::routing::{route, TurnAction};
use crate::agent::store::ConversationStore;
use crate::core::{Config, Message, Result, ToolCall, ToolResult};
use crate::llm::{ChatModel, OpenAiClient};
use crate::render::{render_history, RenderedMessage};
use crate::tools::{DocumentIndex, ToolRegistry, WebSearchClient};

/// Main agent coordinating the model, the tools, and the store.
///
/// Expensive to build (HTTP client wiring, tool bindings); constructed
/// once at startup and shared read-only by every conversation.
pub struct Agent {
    /// Configuration
    config: Config,
    /// Chat model backend
    model: Arc<dyn ChatModel>,
    /// Tool registry
    tools: Arc<ToolRegistry>,
    /// Conversation store
    store: Arc<ConversationStore>,
}

impl Agent {
    /// Create an agent wired to the configured model and search endpoints
    pub fn new(config: Config, index: Arc<dyn DocumentIndex>) -> Result<Self> {
        config.validate()?;

        let model: Arc<dyn ChatModel> = Arc::new(OpenAiClient::from_config(&config));
        let search = WebSearchClient::from_config(&config);
        let tools = Arc::new(ToolRegistry::with_search(
            index,
            config.retrieval.top_k,
            search,
        ));

        Ok(Self {
            config,
            model,
            tools,
            store: Arc::new(ConversationStore::new()),
        })
    }

    /// Create an agent from pre-built parts
    ///
    /// The injection seam used by tests and by callers that bring their
    /// own backend.
    pub fn with_parts(
        config: Config,
        model: Arc<dyn ChatModel>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            config,
            model,
            tools,
            store: Arc::new(ConversationStore::new()),
        }
    }

    /// Run one full turn for a conversation and return the final answer.
    ///
    /// Appends the user message, then alternates model steps and tool
    /// dispatch until the model produces an answer. Every message the
    /// turn produces is appended to the store in order, so the store
    /// always holds an exact replayable transcript. Model failures
    /// propagate to the caller; whatever was appended before the failure
    /// stays in the log.
    pub async fn submit_turn(&self, conversation_id: &str, user_text: &str) -> Result<String> {
        info!(conversation = conversation_id, "turn started");
        self.store.append(conversation_id, Message::user(user_text));

        let definitions = self.tools.definitions();
        let max_rounds = self.config.agent.max_rounds;

        for round in 1..=max_rounds {
            let history = self.store.history(conversation_id);
            let reply = self.model.chat(&history, &definitions).await?;
            let assistant = reply.into_message();
            self.store.append(conversation_id, assistant.clone());

            match route(&assistant) {
                TurnAction::Finish(answer) => {
                    info!(conversation = conversation_id, rounds = round, "turn finished");
                    return Ok(answer);
                }
                TurnAction::Continue(calls) => {
                    debug!(
                        conversation = conversation_id,
                        round,
                        calls = calls.len(),
                        "dispatching tools"
                    );
                    for result in self.dispatch_tools(&calls).await {
                        self.store.append(conversation_id, result.into_message());
                    }
                }
            }
        }

        // Round cap reached without an answer: one final call with tools
        // withheld so the model must answer from what it has seen.
        warn!(
            conversation = conversation_id,
            max_rounds, "round cap reached, forcing an answer"
        );
        let history = self.store.history(conversation_id);
        let reply = self.model.chat(&history, &[]).await?;
        let answer = reply.content.display_text();
        self.store
            .append(conversation_id, Message::assistant(reply.content));

        info!(conversation = conversation_id, rounds = max_rounds, "turn finished");
        Ok(answer)
    }

    /// Execute one round of tool calls.
    ///
    /// Calls are issued concurrently; `join_all` hands the results back
    /// in request order, so each result lands next to the id that asked
    /// for it before the next model step runs.
    async fn dispatch_tools(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        join_all(calls.iter().map(|call| self.tools.execute(call))).await
    }

    /// Render the stored transcript of a conversation for display
    pub fn rendered_history(&self, conversation_id: &str) -> Vec<RenderedMessage> {
        render_history(&self.store.history(conversation_id))
    }

    /// Drop one conversation's log
    pub fn reset(&self, conversation_id: &str) {
        info!(conversation = conversation_id, "conversation reset");
        self.store.clear(conversation_id);
    }

    /// Drop every conversation
    pub fn reset_all(&self) {
        info!("all conversations reset");
        self.store.clear_all();
    }

    /// The underlying conversation store
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConfabError, MessageContent, Role, ToolDefinition};
    use crate::llm::ChatReply;
    use crate::tools::InMemoryIndex;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Chat model that pops scripted replies in order
    struct ScriptedModel {
        replies: Mutex<Vec<ChatReply>>,
    }

    impl ScriptedModel {
        fn new(mut replies: Vec<ChatReply>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn chat(
            &self,
            _messages: &[Message],
            _tools: &[ToolDefinition],
        ) -> crate::core::Result<ChatReply> {
            self.replies
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| ConfabError::model("script exhausted"))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn test_agent(replies: Vec<ChatReply>) -> Agent {
        let mut index = InMemoryIndex::new();
        index.add_document(
            "policy.txt",
            "Refunds are issued within 14 days of purchase.",
        );
        let tools = Arc::new(ToolRegistry::new(Arc::new(index), 4));
        Agent::with_parts(
            Config::default(),
            Arc::new(ScriptedModel::new(replies)),
            tools,
        )
    }

    #[tokio::test]
    async fn test_plain_answer_turn() {
        let agent = test_agent(vec![ChatReply::text("Hi there!", "scripted")]);
        let answer = agent.submit_turn("c1", "Hello").await.unwrap();
        assert_eq!(answer, "Hi there!");

        let history = agent.store().history("c1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_tool_round_then_answer() {
        let call = crate::core::ToolCall::new(
            "t1",
            crate::tools::RETRIEVAL_TOOL,
            json!({"query": "refund"}),
        );
        let agent = test_agent(vec![
            ChatReply::tool_calls(vec![call], "scripted"),
            ChatReply::text("Refunds take 14 days.", "scripted"),
        ]);

        let answer = agent.submit_turn("c1", "What is the refund policy?").await.unwrap();
        assert_eq!(answer, "Refunds take 14 days.");

        // user, assistant tool-call, tool result, assistant answer
        let history = agent.store().history("c1");
        assert_eq!(history.len(), 4);
        assert_eq!(history[1].tool_calls().len(), 1);
        assert_eq!(history[2].role, Role::Tool);
        assert_eq!(history[2].tool_call_id.as_deref(), Some("t1"));
        assert!(history[2].display_text().contains("14 days"));
        assert_eq!(history[3].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_model_failure_preserves_partial_transcript() {
        let call = crate::core::ToolCall::new(
            "t1",
            crate::tools::RETRIEVAL_TOOL,
            json!({"query": "refund"}),
        );
        // Script runs dry after the tool round, so the second model step fails.
        let agent = test_agent(vec![ChatReply::tool_calls(vec![call], "scripted")]);

        let err = agent.submit_turn("c1", "What is the refund policy?").await.unwrap_err();
        assert!(matches!(err, ConfabError::ModelInvocation(_)));

        let history = agent.store().history("c1");
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].role, Role::Tool);
    }

    #[tokio::test]
    async fn test_round_cap_forces_answer() {
        let mut config = Config::default();
        config.agent.max_rounds = 2;

        let looping_call = || {
            crate::core::ToolCall::new(
                "t1",
                crate::tools::RETRIEVAL_TOOL,
                json!({"query": "refund"}),
            )
        };
        let replies = vec![
            ChatReply::tool_calls(vec![looping_call()], "scripted"),
            ChatReply::tool_calls(vec![looping_call()], "scripted"),
            ChatReply::text("Best effort answer.", "scripted"),
        ];

        let mut index = InMemoryIndex::new();
        index.add_document("policy.txt", "Refunds are issued within 14 days.");
        let tools = Arc::new(ToolRegistry::new(Arc::new(index), 4));
        let agent = Agent::with_parts(config, Arc::new(ScriptedModel::new(replies)), tools);

        let answer = agent.submit_turn("c1", "loop forever").await.unwrap();
        assert_eq!(answer, "Best effort answer.");

        // user + 2x(tool-call, tool result) + forced answer
        assert_eq!(agent.store().len("c1"), 6);
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let agent = test_agent(vec![ChatReply::text("Hi!", "scripted")]);
        agent.submit_turn("c1", "Hello").await.unwrap();
        assert!(!agent.store().is_empty("c1"));

        agent.reset("c1");
        assert!(agent.store().is_empty("c1"));
        assert!(agent.rendered_history("c1").is_empty());
    }

    #[tokio::test]
    async fn test_empty_tool_calls_terminate() {
        let reply = ChatReply {
            content: MessageContent::Text("done anyway".to_string()),
            tool_calls: Vec::new(),
            usage: None,
            model: "scripted".to_string(),
        };
        let agent = test_agent(vec![reply]);
        let answer = agent.submit_turn("c1", "Hello").await.unwrap();
        assert_eq!(answer, "done anyway");
        assert_eq!(agent.store().len("c1"), 2);
    }
}
