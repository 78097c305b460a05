//! Hubchat CLI - chat with the GitHub MCP server from a terminal.

mod commands;
mod repl;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hubchat_core::config::Config;
use hubchat_core::github::GithubServer;
use hubchat_core::provider::GenAIProvider;
use hubchat_core::session::ChatSession;

#[derive(Parser)]
#[command(name = "hubchat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive client for the GitHub MCP server", long_about = None)]
struct Cli {
    /// Model to chat with (e.g. gpt-4.1)
    #[arg(short, long)]
    model: String,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the prompt.
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env(&cli.model) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    run(config).await
}

async fn run(config: Config) -> anyhow::Result<()> {
    let provider = GenAIProvider::new(&config.model, &config.api_key);
    let server = GithubServer::open(&config).await?;

    // The session borrows the server; teardown below runs on every exit
    // path out of the REPL, errors included.
    let result = async {
        let session = ChatSession::new(provider, &server).await?;
        repl::run(&config, session).await
    }
    .await;

    if let Err(e) = server.close().await {
        tracing::warn!("MCP session did not close cleanly: {e}");
    }

    result
}
