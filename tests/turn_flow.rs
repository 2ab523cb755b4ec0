//! End-to-end turn flow tests against the public API
//!
//! Drives full turns with a scripted chat model and a real in-memory
//! index, checking transcript shape, failure behavior, and rendering.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use confab::agent::Agent;
use confab::core::{ConfabError, Message, Result, Role, ToolCall, ToolDefinition};
use confab::llm::{ChatModel, ChatReply};
use confab::tools::{DocumentIndex, InMemoryIndex, Snippet, ToolRegistry, RETRIEVAL_TOOL};
use confab::{Config, RoleClass};

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
    async fn chat(&self, _messages: &[Message], _tools: &[ToolDefinition]) -> Result<ChatReply> {
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

/// Index whose searches always fail
struct BrokenIndex;

#[async_trait]
impl DocumentIndex for BrokenIndex {
    async fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<Snippet>> {
        Err(ConfabError::tool("index offline"))
    }
}

fn policy_index() -> InMemoryIndex {
    let mut index = InMemoryIndex::new();
    index.add_document(
        "rules/refunds.txt",
        "Refunds are issued within 14 days of purchase with a valid receipt.",
    );
    index
}

fn retrieval_call(id: &str) -> ToolCall {
    ToolCall::new(id, RETRIEVAL_TOOL, json!({"query": "refund policy"}))
}

fn agent_with(replies: Vec<ChatReply>, index: Arc<dyn DocumentIndex>) -> Agent {
    let tools = Arc::new(ToolRegistry::new(index, 4));
    Agent::with_parts(Config::default(), Arc::new(ScriptedModel::new(replies)), tools)
}

#[tokio::test]
async fn refund_policy_scenario_produces_four_messages() {
    let agent = agent_with(
        vec![
            ChatReply::tool_calls(vec![retrieval_call("t1")], "scripted"),
            ChatReply::text("Refunds are issued within 14 days.", "scripted"),
        ],
        Arc::new(policy_index()),
    );

    let answer = agent
        .submit_turn("conv-1", "What is the refund policy?")
        .await
        .unwrap();
    assert_eq!(answer, "Refunds are issued within 14 days.");

    let history = agent.store().history("conv-1");
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].tool_calls().len(), 1);
    assert_eq!(history[2].role, Role::Tool);
    assert_eq!(history[2].tool_call_id.as_deref(), Some("t1"));
    assert!(history[2].display_text().contains("14 days"));
    assert_eq!(history[3].role, Role::Assistant);
    assert!(history[3].tool_calls().is_empty());
}

#[tokio::test]
async fn failing_tool_is_visible_and_turn_still_completes() {
    let agent = agent_with(
        vec![
            ChatReply::tool_calls(vec![retrieval_call("t1")], "scripted"),
            ChatReply::text("I could not reach the document index.", "scripted"),
        ],
        Arc::new(BrokenIndex),
    );

    let answer = agent
        .submit_turn("conv-1", "What is the refund policy?")
        .await
        .unwrap();
    assert_eq!(answer, "I could not reach the document index.");

    let history = agent.store().history("conv-1");
    assert_eq!(history.len(), 4);
    assert_eq!(history[2].role, Role::Tool);
    assert!(history[2].display_text().contains("index offline"));
}

#[tokio::test]
async fn each_requested_call_gets_exactly_one_result() {
    let calls = vec![retrieval_call("t1"), retrieval_call("t2")];
    let agent = agent_with(
        vec![
            ChatReply::tool_calls(calls, "scripted"),
            ChatReply::text("Done.", "scripted"),
        ],
        Arc::new(policy_index()),
    );

    agent.submit_turn("conv-1", "Double check the policy").await.unwrap();

    let history = agent.store().history("conv-1");
    // user, assistant tool-call, two tool results in request order, answer
    assert_eq!(history.len(), 5);
    assert_eq!(history[2].tool_call_id.as_deref(), Some("t1"));
    assert_eq!(history[3].tool_call_id.as_deref(), Some("t2"));
}

#[tokio::test]
async fn rendered_history_shows_only_user_and_final_answer() {
    let agent = agent_with(
        vec![
            ChatReply::tool_calls(vec![retrieval_call("t1")], "scripted"),
            ChatReply::text("Refunds take **14 days**.", "scripted"),
        ],
        Arc::new(policy_index()),
    );

    agent
        .submit_turn("conv-1", "What is the refund policy?")
        .await
        .unwrap();

    let rendered = agent.rendered_history("conv-1");
    assert_eq!(rendered.len(), 2);
    assert_eq!(rendered[0].role_class, RoleClass::User);
    assert_eq!(rendered[1].role_class, RoleClass::Bot);
    assert!(rendered[1].html.contains("<strong>14 days</strong>"));

    // re-rendering the stored log is byte-identical
    assert_eq!(agent.rendered_history("conv-1"), rendered);
}

#[tokio::test]
async fn unknown_conversation_reads_empty_and_reset_is_noop() {
    let agent = agent_with(Vec::new(), Arc::new(policy_index()));

    assert!(agent.rendered_history("never-seen").is_empty());
    agent.reset("never-seen");
    assert!(agent.store().is_empty("never-seen"));
}

#[tokio::test]
async fn reset_clears_prior_messages() {
    let agent = agent_with(
        vec![ChatReply::text("Hello!", "scripted")],
        Arc::new(policy_index()),
    );

    agent.submit_turn("conv-1", "Hi").await.unwrap();
    assert_eq!(agent.store().len("conv-1"), 2);

    agent.reset("conv-1");
    assert!(agent.rendered_history("conv-1").is_empty());
}

#[tokio::test]
async fn reset_all_clears_every_conversation() {
    let agent = agent_with(
        vec![
            ChatReply::text("Hello one!", "scripted"),
            ChatReply::text("Hello two!", "scripted"),
        ],
        Arc::new(policy_index()),
    );

    agent.submit_turn("conv-1", "Hi").await.unwrap();
    agent.submit_turn("conv-2", "Hi").await.unwrap();

    agent.reset_all();
    assert!(agent.store().is_empty("conv-1"));
    assert!(agent.store().is_empty("conv-2"));
}

/// Chat model that answers with the latest user message, for concurrency
/// tests where scripted ordering would be nondeterministic
struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    async fn chat(&self, messages: &[Message], _tools: &[ToolDefinition]) -> Result<ChatReply> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.display_text())
            .unwrap_or_default();
        Ok(ChatReply::text(format!("echo: {}", last_user), "echo"))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

#[tokio::test]
async fn concurrent_conversations_keep_separate_transcripts() {
    let tools = Arc::new(ToolRegistry::new(Arc::new(policy_index()), 4));
    let agent = Arc::new(Agent::with_parts(
        Config::default(),
        Arc::new(EchoModel),
        tools,
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let agent = Arc::clone(&agent);
        handles.push(tokio::spawn(async move {
            let id = format!("conv-{}", i);
            agent.submit_turn(&id, &format!("hello-{}", i)).await.unwrap()
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap(), format!("echo: hello-{}", i));
    }

    for i in 0..8 {
        let history = agent.store().history(&format!("conv-{}", i));
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].display_text(), format!("hello-{}", i));
        assert_eq!(history[1].display_text(), format!("echo: hello-{}", i));
    }
}
