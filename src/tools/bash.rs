//! Shell command execution tool.

use std::process::Stdio;

use serde::Deserialize;
use serde_json::json;
use tokio::process::Command;

use crate::llm::ToolDefinition;

use super::ToolError;

pub const BASH_TOOL_NAME: &str = "bash";

/// Arguments of a `bash` tool call.
#[derive(Debug, Clone, Deserialize)]
pub struct BashArgs {
    /// The bash command to execute.
    pub command: String,
}

impl BashArgs {
    /// Decode arguments from the model's JSON payload.
    pub fn decode(arguments: &str) -> Result<Self, ToolError> {
        serde_json::from_str(arguments).map_err(|source| ToolError::BadArguments {
            tool: BASH_TOOL_NAME.to_string(),
            source,
        })
    }
}

/// The `bash` tool declaration sent with every completion request.
pub fn bash_tool() -> ToolDefinition {
    ToolDefinition::function(
        BASH_TOOL_NAME,
        "Execute bash commands on a linux shell.",
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The bash command to execute."
                }
            },
            "required": ["command"]
        }),
    )
}

/// Run a command under `bash -c` and return its combined output.
///
/// The command inherits the process environment and working directory.
/// A non-zero exit is an error carrying the captured output; it is
/// never reported back to the model.
pub async fn run_bash(command: &str) -> Result<String, ToolError> {
    tracing::debug!(command, "executing bash command");

    let output = Command::new("bash")
        .arg("-c")
        .arg(command)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(ToolError::CommandFailed {
            status: output.status,
            output: combined,
        });
    }

    Ok(combined)
}
