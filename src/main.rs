mod commands;
mod utils;

use std::env;

use anyhow::Result;
use calboard::{CalendarView, EventClient, EventStateStore, Granularity, Viewport};
use calboard_core::Category;
use calboard_core::config::Settings;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::drag::Drag;

#[derive(Parser)]
#[command(name = "calboard")]
#[command(about = "View your calendar and create, move, or resize events")]
struct Cli {
    /// Events API base URL (defaults to the configured api_url)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the calendar
    View {
        /// Granularity (defaults to week, or day on narrow terminals)
        #[arg(long, value_enum)]
        view: Option<Granularity>,

        /// Date to show (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Select a slot and create an event in it
    New {
        #[arg(short, long)]
        title: Option<String>,

        /// exercise, eating, work, relax, family or social
        #[arg(short, long)]
        category: Option<Category>,

        /// Slot start (e.g., "2025-03-20T15:00")
        #[arg(short, long)]
        start: Option<String>,

        /// Slot end (defaults to a 30 minute slot)
        #[arg(short, long)]
        end: Option<String>,
    },
    /// Drag an event to a new time
    Move {
        id: String,

        /// Offset such as "1h" or "-30m"
        #[arg(long, allow_hyphen_values = true)]
        by: String,
    },
    /// Drag an event's end edge
    Resize {
        id: String,

        /// Offset such as "15m" or "-30m"
        #[arg(long, allow_hyphen_values = true)]
        by: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CALBOARD_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let format = env::var("CALBOARD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::load()?;

    let api_url = cli.api_url.unwrap_or(settings.api_url);
    debug!(%api_url, "using events API");

    let store = EventStateStore::new(EventClient::new(api_url));
    let view = CalendarView::new(store, Viewport::detect(), Utc::now().date_naive());

    match cli.command {
        Commands::View { view: granularity, date } => {
            commands::view::run(view, granularity, date).await
        }
        Commands::New {
            title,
            category,
            start,
            end,
        } => commands::new::run(view, title, category, start, end).await,
        Commands::Move { id, by } => commands::drag::run(view, Drag::Move, &id, &by).await,
        Commands::Resize { id, by } => commands::drag::run(view, Drag::Resize, &id, &by).await,
    }
}
