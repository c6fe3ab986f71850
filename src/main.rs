use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use invoice_service::{AppState, config, db, init_tracing, start_server};

/// Invoice HTTP service
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address to listen on (overrides BIND_ADDR)
    #[arg(long)]
    bind: Option<String>,

    /// SQLite URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = config::init()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {:?}", config.bind_addr))?;

    let db = db::init(&config).await?;
    info!(database_url = config.database_url(), "Database connection established");

    start_server(AppState::new(db, &config), addr).await?;

    Ok(())
}
