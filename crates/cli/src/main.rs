//! Sommelier CLI — the main entry point.
//!
//! Commands:
//! - `serve` — Start the chat gateway
//! - `check` — Validate configuration and corpus

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "sommelier",
    about = "Sophia the Sommelier — wine-pairing chat assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway and chat frontend
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration and the document corpus
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Check => commands::check::run()?,
    }

    Ok(())
}
