//! imgx - imgboard-explorer CLI
//!
//! Fetch upstream documents through the cached, rate-limited client and
//! print them as pretty JSON.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use imgboard_explorer::{ChanApi, ChanClient, Config};
use serde::Serialize;

/// Imageboard API explorer
#[derive(Parser)]
#[command(name = "imgx")]
#[command(version)]
#[command(about = "Read-only imageboard API client")]
struct Args {
    /// Config file (default: ~/.imgboard-explorer/config.toml)
    #[arg(short, long, env = "IMGX_CONFIG")]
    config: Option<PathBuf>,

    /// Override the upstream API root
    #[arg(long, env = "IMGX_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all boards
    Boards,

    /// Show the catalog of a board
    Catalog {
        /// Board short name, e.g. "v"
        board: String,
    },

    /// Show one thread
    Thread {
        /// Board short name
        board: String,
        /// Thread number
        no: u64,
    },

    /// Fetch a raw JSON document by path
    Get {
        /// Path relative to the API root, e.g. "/boards.json"
        path: String,
        /// Freshness window in seconds
        #[arg(long, default_value_t = 10)]
        ttl: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.upstream.base_url = base_url;
    }

    let client = ChanClient::from_config(&config)?;
    client.start()?;

    let result = run(&client, args.command).await;
    client.close();
    result
}

async fn run(client: &ChanClient, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Boards => print_json(&client.boards().await?),
        Command::Catalog { board } => print_json(&client.catalog(&board).await?),
        Command::Thread { board, no } => print_json(&client.thread(&board, no).await?),
        Command::Get { path, ttl } => {
            let payload = client.fetch_json(&path, Duration::from_secs(ttl)).await?;
            print_json(payload.as_ref())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
