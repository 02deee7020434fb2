//! Image bracket tournament server.
//!
//! Serves the bracket API over HTTP:
//! 1. Register uploaded images as entrants
//! 2. Generate a single-elimination bracket and vote matches through it
//!
//! Usage:
//!   imagebracket-server --port 3000 --database imagebracket.db
//!
//! Uploaded files themselves are stored and served by the front end.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use imagebracket_engine::{SeededShuffler, Shuffler, ThreadRngShuffler, Tournament};
use imagebracket_server::build_router;
use imagebracket_store::SqliteStore;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const IN_MEMORY: &str = ":memory:";

#[derive(Parser, Debug)]
#[command(name = "imagebracket-server")]
#[command(about = "Single-elimination image tournament server")]
struct Args {
    /// HTTP port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// SQLite database file (":memory:" for a throwaway store)
    #[arg(short, long, default_value = "imagebracket.db")]
    database: PathBuf,

    /// Seed for reproducible bracket shuffles
    #[arg(long)]
    seed: Option<u64>,

    /// Wipe entrants and matches on startup
    #[arg(long)]
    reset_on_start: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Image bracket server starting...");
    let store = if args.database.as_os_str() == IN_MEMORY {
        SqliteStore::open_in_memory().context("Failed to open in-memory store")?
    } else {
        SqliteStore::open(&args.database)
            .with_context(|| format!("Failed to open database {}", args.database.display()))?
    };

    let shuffler: Box<dyn Shuffler> = match args.seed {
        Some(seed) => {
            info!("Using seeded shuffle ({})", seed);
            Box::new(SeededShuffler::new(seed))
        }
        None => Box::new(ThreadRngShuffler),
    };
    let tournament = Arc::new(Tournament::with_sqlite(store, shuffler));

    if args.reset_on_start {
        info!("Resetting database...");
        tournament.reset().context("Failed to reset tournament")?;
    }

    let app = build_router(tournament);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", args.port))?;
    info!("Server running at http://localhost:{}", args.port);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
