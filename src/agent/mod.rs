//! Agent module - the completion client.
//!
//! One turn follows a single tool round-trip pattern:
//! 1. Call the LLM with the full history and the bash tool declaration
//! 2. If the LLM answers with text, that is the final reply
//! 3. If it requests tool calls, execute each one, append the results,
//!    and call the LLM once more for the final reply

mod turn;

pub use turn::{Agent, AgentError};
