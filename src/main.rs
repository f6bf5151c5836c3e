//! Keychat binary: an interactive prompt loop over a single chat session.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod repl;

/// Bring-your-own-key LLM chat client with automatic provider detection.
#[derive(Parser)]
#[command(name = "keychat", version, about)]
struct Cli {
    /// Log filter directive (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.log {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("keychat=warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    repl::run().await
}
