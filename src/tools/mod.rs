//! Local tools the model may invoke.
//!
//! One tool is exposed: `bash`, which runs a shell command and returns
//! its combined output.

mod bash;

use thiserror::Error;

pub use bash::{bash_tool, run_bash, BashArgs, BASH_TOOL_NAME};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("model requested unknown tool: {0}")]
    UnknownTool(String),

    #[error("decoding {tool} tool arguments: {source}")]
    BadArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("spawning bash: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("bash command exited with {status}: {output}")]
    CommandFailed {
        status: std::process::ExitStatus,
        output: String,
    },
}
