//! Completion client with a one-shot tool round-trip.

use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, LlmError, OpenRouterClient, ToolDefinition};
use crate::tools::{bash_tool, run_bash, BashArgs, ToolError, BASH_TOOL_NAME};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("LLM returned empty reply")]
    EmptyReply,
}

/// The completion client.
///
/// Holds the LLM backend and model identifier; the conversation itself
/// is owned by the caller and passed in by mutable reference.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl Agent {
    /// Create an agent backed by the OpenRouter client from the given
    /// configuration.
    pub fn from_config(config: &Config) -> Self {
        let llm = Arc::new(OpenRouterClient::new(
            config.base_url.clone(),
            config.api_key.clone(),
        ));
        Self::new(llm, config.model.clone())
    }

    /// Create an agent with an explicit backend (useful for testing).
    pub fn new(llm: Arc<dyn LlmClient>, model: String) -> Self {
        Self { llm, model }
    }

    /// Run one turn with the bash tool declared.
    ///
    /// If the model requests tool calls, the assistant's tool-call
    /// message and exactly one result message per call are appended to
    /// `messages` before the second request, each result carrying the
    /// id of the call it answers. A call naming any tool other than
    /// `bash` fails the turn: the API rejects a follow-up request that
    /// is missing an expected tool result, so skipping is not an option.
    pub async fn complete_turn(
        &self,
        messages: &mut Vec<ChatMessage>,
    ) -> Result<String, AgentError> {
        let tools = [bash_tool()];

        let response = self
            .llm
            .chat_completion(&self.model, messages, Some(&tools))
            .await?;

        let tool_calls = match response.tool_calls.clone() {
            Some(calls) if !calls.is_empty() => calls,
            _ => return reply_text(response),
        };

        messages.push(ChatMessage::assistant_tool_calls(
            response.content.clone(),
            tool_calls.clone(),
        ));

        for call in &tool_calls {
            if call.function.name != BASH_TOOL_NAME {
                return Err(ToolError::UnknownTool(call.function.name.clone()).into());
            }

            let args = BashArgs::decode(&call.function.arguments)?;
            let output = run_bash(&args.command).await?;

            messages.push(ChatMessage::tool_result(
                call.id.clone(),
                call.function.name.clone(),
                output,
            ));
        }

        // Re-run the completion with the tool outputs appended.
        let response = self
            .llm
            .chat_completion(&self.model, messages, Some(&tools))
            .await?;

        reply_text(response)
    }

    /// Run one turn with no tools declared.
    pub async fn complete_turn_plain(
        &self,
        messages: &mut Vec<ChatMessage>,
    ) -> Result<String, AgentError> {
        let response = self
            .llm
            .chat_completion(&self.model, messages, None)
            .await?;
        reply_text(response)
    }
}

fn reply_text(response: ChatMessage) -> Result<String, AgentError> {
    response.content.ok_or(AgentError::EmptyReply)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm::{FunctionCall, Role, ToolCall};

    /// Backend returning scripted responses and recording every request.
    struct ScriptedLlm {
        responses: Mutex<Vec<ChatMessage>>,
        requests: Mutex<Vec<(Vec<ChatMessage>, bool)>>,
    }

    impl ScriptedLlm {
        fn new(mut responses: Vec<ChatMessage>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(Vec<ChatMessage>, bool)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat_completion(
            &self,
            _model: &str,
            messages: &[ChatMessage],
            tools: Option<&[ToolDefinition]>,
        ) -> Result<ChatMessage, LlmError> {
            self.requests
                .lock()
                .unwrap()
                .push((messages.to_vec(), tools.is_some()));
            Ok(self.responses.lock().unwrap().pop().expect("script exhausted"))
        }
    }

    fn bash_call(id: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: "bash".to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    fn agent_with(llm: Arc<ScriptedLlm>) -> Agent {
        Agent::new(llm, "test/model".to_string())
    }

    #[tokio::test]
    async fn text_reply_leaves_history_untouched() {
        let llm = Arc::new(ScriptedLlm::new(vec![ChatMessage::assistant("Paris.")]));
        let agent = agent_with(llm.clone());

        let mut messages = vec![ChatMessage::system("sys"), ChatMessage::user("capital?")];
        let reply = agent.complete_turn(&mut messages).await.unwrap();

        assert_eq!(reply, "Paris.");
        assert_eq!(messages.len(), 2);

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].1, "bash tool must be declared");
    }

    #[tokio::test]
    async fn tool_call_round_trip_appends_stub_and_result() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            ChatMessage::assistant_tool_calls(
                None,
                vec![bash_call("call_1", r#"{"command":"echo hi"}"#)],
            ),
            ChatMessage::assistant("it printed hi"),
        ]));
        let agent = agent_with(llm.clone());

        let mut messages = vec![ChatMessage::system("sys"), ChatMessage::user("run echo hi")];
        let reply = agent.complete_turn(&mut messages).await.unwrap();
        assert_eq!(reply, "it printed hi");

        // One assistant tool-call stub plus one result per call.
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].tool_calls.as_ref().unwrap()[0].id, "call_1");
        assert_eq!(messages[3].role, Role::Tool);
        assert_eq!(messages[3].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(messages[3].name.as_deref(), Some("bash"));
        assert_eq!(messages[3].content.as_deref(), Some("hi\n"));

        // The second request carries the tool result and the tool declaration.
        let requests = llm.requests();
        assert_eq!(requests.len(), 2);
        let (second, with_tools) = &requests[1];
        assert!(*with_tools);
        assert_eq!(second.len(), 4);
        assert_eq!(second[3].tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn every_call_gets_exactly_one_result() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            ChatMessage::assistant_tool_calls(
                None,
                vec![
                    bash_call("call_1", r#"{"command":"echo one"}"#),
                    bash_call("call_2", r#"{"command":"echo two"}"#),
                ],
            ),
            ChatMessage::assistant("done"),
        ]));
        let agent = agent_with(llm.clone());

        let mut messages = vec![ChatMessage::system("sys"), ChatMessage::user("go")];
        agent.complete_turn(&mut messages).await.unwrap();

        // Stub plus two results, in call order.
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[3].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(messages[3].content.as_deref(), Some("one\n"));
        assert_eq!(messages[4].tool_call_id.as_deref(), Some("call_2"));
        assert_eq!(messages[4].content.as_deref(), Some("two\n"));
    }

    #[tokio::test]
    async fn unknown_tool_fails_the_turn_without_running_a_shell() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("invoked");
        let arguments = format!(r#"{{"command":"touch {}"}}"#, marker.display());

        let call = ToolCall {
            id: "call_1".to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: "python".to_string(),
                arguments,
            },
        };
        let llm = Arc::new(ScriptedLlm::new(vec![ChatMessage::assistant_tool_calls(
            None,
            vec![call],
        )]));
        let agent = agent_with(llm);

        let mut messages = vec![ChatMessage::user("go")];
        let err = agent.complete_turn(&mut messages).await.unwrap_err();

        assert!(matches!(
            err,
            AgentError::Tool(ToolError::UnknownTool(ref name)) if name == "python"
        ));
        assert!(!marker.exists(), "shell must not run for unknown tools");
    }

    #[tokio::test]
    async fn malformed_arguments_fail_the_turn() {
        let llm = Arc::new(ScriptedLlm::new(vec![ChatMessage::assistant_tool_calls(
            None,
            vec![bash_call("call_1", "not json")],
        )]));
        let agent = agent_with(llm);

        let mut messages = vec![ChatMessage::user("go")];
        let err = agent.complete_turn(&mut messages).await.unwrap_err();
        assert!(matches!(err, AgentError::Tool(ToolError::BadArguments { .. })));
    }

    #[tokio::test]
    async fn failed_command_is_never_model_visible() {
        let llm = Arc::new(ScriptedLlm::new(vec![ChatMessage::assistant_tool_calls(
            None,
            vec![bash_call("call_1", r#"{"command":"exit 7"}"#)],
        )]));
        let agent = agent_with(llm.clone());

        let mut messages = vec![ChatMessage::user("go")];
        let err = agent.complete_turn(&mut messages).await.unwrap_err();
        assert!(matches!(err, AgentError::Tool(ToolError::CommandFailed { .. })));

        // The turn ended after the first request; no result reached the model.
        assert_eq!(llm.requests().len(), 1);
    }

    #[tokio::test]
    async fn plain_turn_declares_no_tools() {
        let llm = Arc::new(ScriptedLlm::new(vec![ChatMessage::assistant("hi")]));
        let agent = agent_with(llm.clone());

        let mut messages = vec![ChatMessage::user("hello")];
        let reply = agent.complete_turn_plain(&mut messages).await.unwrap();

        assert_eq!(reply, "hi");
        let requests = llm.requests();
        assert!(!requests[0].1, "plain variant must not declare tools");
    }

    #[tokio::test]
    async fn empty_reply_is_an_error() {
        let empty = ChatMessage {
            role: Role::Assistant,
            content: None,
            tool_calls: None,
            name: None,
            tool_call_id: None,
        };
        let llm = Arc::new(ScriptedLlm::new(vec![empty]));
        let agent = agent_with(llm);

        let mut messages = vec![ChatMessage::user("hello")];
        let err = agent.complete_turn(&mut messages).await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyReply));
    }
}
