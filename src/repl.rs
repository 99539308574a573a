//! The conversation loop.
//!
//! Reads one line of input at a time, relays it through the completion
//! client, and prints the reply. The conversation history lives here,
//! owned by the loop and extended turn by turn; it is never persisted.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::agent::Agent;
use crate::config::Config;
use crate::llm::ChatMessage;

/// Whether the bash tool is declared on completion requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMode {
    /// Declare the bash tool (the `bashchat` binary).
    Bash,
    /// Declare no tools (the `chat` binary).
    Plain,
}

/// What to do with one line of input.
#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Quit,
    Send(String),
}

/// Trim surrounding whitespace and detect the exit sentinel.
fn parse_input(line: &str) -> InputAction {
    let line = line.trim();
    if line == "exit" {
        InputAction::Quit
    } else {
        InputAction::Send(line.to_string())
    }
}

/// Run one turn: append the user message, complete it, and append the
/// assistant reply. Printing is left to the caller.
async fn run_turn(
    agent: &Agent,
    mode: ToolMode,
    messages: &mut Vec<ChatMessage>,
    input: String,
) -> anyhow::Result<String> {
    messages.push(ChatMessage::user(input));

    let reply = match mode {
        ToolMode::Bash => agent.complete_turn(messages).await?,
        ToolMode::Plain => agent.complete_turn_plain(messages).await?,
    };

    messages.push(ChatMessage::assistant(reply.clone()));
    Ok(reply)
}

/// Run the read-eval-print loop until `exit` is read.
///
/// End of input or a read failure ends the process with an error; any
/// failure mid-turn is fatal and discards the conversation.
pub async fn run(agent: &Agent, config: &Config, mode: ToolMode) -> anyhow::Result<()> {
    let mut messages = vec![ChatMessage::system(config.system_prompt.clone())];

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut line = String::new();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        line.clear();
        let read = stdin
            .read_line(&mut line)
            .await
            .context("reading message")?;
        if read == 0 {
            anyhow::bail!("reading message: end of input");
        }

        let input = match parse_input(&line) {
            InputAction::Quit => return Ok(()),
            InputAction::Send(input) => input,
        };

        let reply = run_turn(agent, mode, &mut messages, input).await?;

        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
}
