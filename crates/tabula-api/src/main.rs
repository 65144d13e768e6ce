//! tabula server
//!
//! Serves the REST CRUD API over a SQLite database.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tabula_api::config::{DEFAULT_BASE_PATH, DEFAULT_DATABASE, DEFAULT_LISTEN, DEFAULT_MAX_RECS};
use tabula_api::{build_dispatcher, server, ApiConfig, ApiContext, SqliteDatabase};

/// Generic REST access to the tables of a SQLite database.
#[derive(Parser)]
#[command(name = "tabula")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL; the file is created if missing.
    #[arg(short, long, env = "TABULA_DATABASE", default_value = DEFAULT_DATABASE)]
    database: String,

    /// Prefix of every API path.
    #[arg(short, long, env = "TABULA_BASE_PATH", default_value = DEFAULT_BASE_PATH)]
    base_path: String,

    /// Maximum number of records returned by one request.
    #[arg(short, long, env = "TABULA_MAX_RECS", default_value_t = DEFAULT_MAX_RECS)]
    max_recs: i64,

    /// Address to listen on.
    #[arg(short, long, env = "TABULA_LISTEN", default_value = DEFAULT_LISTEN)]
    listen: SocketAddr,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if cli.max_recs <= 0 {
        anyhow::bail!("--max-recs must be positive, got {}", cli.max_recs);
    }

    let config = ApiConfig {
        database: cli.database,
        base_path: cli.base_path,
        max_recs: cli.max_recs,
        listen: cli.listen,
    };

    // Connect to database
    let db = SqliteDatabase::connect(&config.database, 5).await?;
    info!(database = %config.database, max_recs = config.max_recs, "database opened");

    let listener = TcpListener::bind(config.listen).await?;
    let ctx = Arc::new(ApiContext::new(config, Arc::new(db)));
    let dispatcher = build_dispatcher(ctx)?;

    tokio::select! {
        res = server::serve(listener, dispatcher) => res?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }

    Ok(())
}
