//! bashchat - chat client with the bash tool enabled.

use bashchat::{agent::Agent, config::Config, repl};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize logging; diagnostics go to stderr so replies stay clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bashchat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing::debug!(model = %config.model, base_url = %config.base_url, "loaded configuration");

    let agent = Agent::from_config(&config);
    repl::run(&agent, &config, repl::ToolMode::Bash).await
}
