//! # bashchat
//!
//! A minimal command-line chat client for OpenAI-compatible
//! chat-completion endpoints (reached through OpenRouter), with an
//! optional one-shot "bash" tool.
//!
//! This library provides:
//! - A conversation loop reading user input line by line
//! - A completion client with a single tool-call round-trip
//! - A bash tool executing shell commands on the local machine
//!
//! ## Architecture
//!
//! Each turn is fully sequential:
//! 1. Read a line of input and append it to the conversation
//! 2. Call the completion endpoint with the full history
//! 3. If the model requests bash tool calls, execute them, append the
//!    results, and call the endpoint once more
//! 4. Print the final reply and append it to the conversation
//!
//! ## Example
//!
//! ```rust,ignore
//! use bashchat::{agent::Agent, config::Config, repl};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::from_config(&config);
//! repl::run(&agent, &config, repl::ToolMode::Bash).await?;
//! ```

pub mod agent;
pub mod config;
pub mod llm;
pub mod repl;
pub mod tools;

pub use config::Config;
