use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use calboard_core::config::Settings;
use calboard_server::store::{DocumentStore, MemoryStore};
use calboard_server::{AppState, singleton};

#[derive(Parser)]
#[command(name = "calboard-server")]
#[command(about = "Serve the calboard events API")]
struct Args {
    /// Address to bind (defaults to the configured host)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (defaults to the configured port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory for event documents (defaults to the configured data_dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep events in memory only; nothing is written to disk
    #[arg(long)]
    memory: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CALBOARD_LOG")
        .unwrap_or_else(|_| EnvFilter::new("calboard_server=info,tower_http=info,warn"));

    let format = env::var("CALBOARD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let settings = Settings::load()?;

    let host = args.host.unwrap_or(settings.host.clone());
    let port = args.port.unwrap_or(settings.port);

    let (state, _lock) = if args.memory {
        info!("using in-memory event store");
        (AppState::new(MemoryStore::new()), None)
    } else {
        let data_dir = args.data_dir.unwrap_or_else(|| settings.data_path());
        // Ensure only one server writes to this directory
        let lock = singleton::acquire_lock(&data_dir)?;
        (AppState::new(DocumentStore::open(&data_dir)?), Some(lock))
    };

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("calboard-server listening on http://{}", listener.local_addr()?);

    calboard_server::serve(listener, state).await?;

    Ok(())
}
