use anyhow::Result;
use clap::Parser;

use invoice_service::{config, db::Database, init_tracing, seed};

/// Insert the sample invoice rows into the database
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// SQLite URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = config::Config::load()?;
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    let db = Database::new(&config).await?;
    let inserted = seed::seed(&db).await?;
    println!("Sample data inserted ({inserted} rows).");

    Ok(())
}
