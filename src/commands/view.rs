use anyhow::Result;
use calboard::render::render_view;
use calboard::{CalendarView, EventApi, Granularity};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

pub async fn run<A: EventApi>(
    mut view: CalendarView<A>,
    granularity: Option<Granularity>,
    date: Option<NaiveDate>,
) -> Result<()> {
    if let Some(granularity) = granularity {
        if !view.set_granularity(granularity) {
            let available: Vec<String> =
                view.viewport().granularities().iter().map(|g| g.to_string()).collect();
            eprintln!(
                "{}",
                format!(
                    "  The {} view does not fit this terminal. Available: {}",
                    granularity,
                    available.join(", ")
                )
                .yellow()
            );
        }
    }

    if let Some(date) = date {
        view.go_to(date);
    }

    let fetched = super::wait("Loading events...", view.refresh()).await;

    // A failed fetch is drawn as the error banner, then reported.
    println!("{}", render_view(&view, &view.store().snapshot()));

    if let Err(e) = fetched {
        anyhow::bail!("Could not load events: {}", e);
    }

    Ok(())
}
