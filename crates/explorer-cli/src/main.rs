use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use explorer_cli::{Explorer, ExplorerConfig, Snapshot};
use explorer_protocol::Environment;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect a network snapshot: nodes, topology and search")]
struct Args {
    /// Config file (defaults to <config dir>/network-explorer/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Environment override: mainnet, testnet or local
    #[arg(long)]
    env: Option<Environment>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List nodes, one page at a time
    Nodes {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        page: Option<i64>,
        /// Select a node and show its page
        #[arg(long)]
        select: Option<String>,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Show visible nodes, adjacency and connections
    Topology {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        stream: Option<String>,
    },
    /// Search nodes, streams and places
    Search {
        #[arg(long)]
        snapshot: PathBuf,
        phrase: String,
    },
    /// List nodes sharing a node's location
    Roommates {
        #[arg(long)]
        snapshot: PathBuf,
        node_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match args.config.clone().or_else(ExplorerConfig::default_path) {
        Some(path) => ExplorerConfig::load(&path)?,
        None => ExplorerConfig::default(),
    };
    if let Some(env) = args.env {
        config.environment = env;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(environment = %config.environment, "Configuration loaded");

    match args.command {
        Command::Nodes {
            snapshot,
            page,
            select,
            page_size,
        } => {
            if let Some(page_size) = page_size {
                config.view.page_size = page_size;
            }
            let explorer = open(&snapshot, &config, None).await?;
            print_json(&explorer.nodes_page(page, select.as_deref()).await)
        }
        Command::Topology { snapshot, stream } => {
            let explorer = open(&snapshot, &config, stream).await?;
            print_json(&explorer.topology().await)
        }
        Command::Search { snapshot, phrase } => {
            let explorer = open(&snapshot, &config, None).await?;
            print_json(&explorer.search(&phrase).await)
        }
        Command::Roommates { snapshot, node_id } => {
            let explorer = open(&snapshot, &config, None).await?;
            print_json(&explorer.roommates(&node_id).await)
        }
    }
}

async fn open(
    path: &std::path::Path,
    config: &ExplorerConfig,
    stream: Option<String>,
) -> anyhow::Result<Explorer> {
    let snapshot = Snapshot::load(path)?;
    let explorer = Explorer::new(snapshot, config);
    explorer.load(stream).await;
    Ok(explorer)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{json}");
    Ok(())
}
