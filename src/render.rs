//! Terminal rendering for the calendar view.
//!
//! Events are drawn as colored chips (white text on the category color).

use std::ops::Range;

use calboard_core::{Category, Event};
use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use owo_colors::OwoColorize;

use crate::client::EventApi;
use crate::palette::{self, Rgb};
use crate::state::Snapshot;
use crate::view::{CalendarView, Granularity, overlaps, start_of_day};

pub const APP_TITLE: &str = "calboard";

/// Hours always shown by the day and week grids.
const WORKING_HOURS: Range<u32> = 8..18;

/// Width of the `HH:MM │` gutter.
const GUTTER: usize = 8;

const MIN_COLUMN_WIDTH: usize = 8;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        chip(&format!(" {} ", self.title), palette::category_color(self.category))
    }
}

impl Render for Category {
    fn render(&self) -> String {
        let Rgb(r, g, b) = palette::category_color(*self);
        self.label().truecolor(r, g, b).to_string()
    }
}

fn chip(text: &str, color: Rgb) -> String {
    let Rgb(r, g, b) = color;
    text.white().on_truecolor(r, g, b).to_string()
}

/// Render the whole screen: header, error banner, then the grid.
pub fn render_view<A: EventApi>(view: &CalendarView<A>, snapshot: &Snapshot) -> String {
    let mut lines = vec![render_header(view)];

    if let Some(error) = &snapshot.last_error {
        lines.push(format!("{} {}", "✖".red(), error.red()));
    }

    let days = view.days();
    let events = view.visible_events(&snapshot.items);

    match view.granularity() {
        Granularity::Agenda => render_agenda(&days, &events, &mut lines),
        Granularity::Day | Granularity::Week => {
            render_grid(&days, &events, view.viewport().columns, &mut lines)
        }
    }

    lines.join("\n")
}

fn render_header<A: EventApi>(view: &CalendarView<A>) -> String {
    let days = view.days();
    let first = days.first().copied().unwrap_or(view.anchor());
    let last = days.last().copied().unwrap_or(view.anchor());

    let title = match view.granularity() {
        Granularity::Day => first.format("%A, %b %d %Y").to_string(),
        Granularity::Week | Granularity::Agenda => {
            format!("{} – {}", first.format("%b %d"), last.format("%b %d %Y"))
        }
    };

    format!(
        "📅 {}  {}  {}",
        APP_TITLE.bold(),
        title,
        format!("[{}]", view.granularity()).dimmed()
    )
}

fn render_agenda(days: &[NaiveDate], events: &[Event], lines: &mut Vec<String>) {
    let mut any = false;

    for day in days {
        let from = start_of_day(*day);
        let todays: Vec<&Event> = events
            .iter()
            .filter(|e| overlaps(e, from, from + Duration::days(1)))
            .collect();
        if todays.is_empty() {
            continue;
        }

        any = true;
        lines.push(String::new());
        lines.push(day.format("%a %b %d").bold().to_string());
        for event in todays {
            lines.push(format!(
                "   {}  {} {}",
                render_time_range(event).dimmed(),
                event.render(),
                event.category.render()
            ));
        }
    }

    if !any {
        lines.push("   No events in this range".dimmed().to_string());
    }
}

fn render_time_range(event: &Event) -> String {
    format!("{}–{}", event.start.format("%H:%M"), event.end.format("%H:%M"))
}

/// Hours the grid needs: working hours widened to fit every event on `days`.
pub fn hour_span(days: &[NaiveDate], events: &[Event]) -> Range<u32> {
    let mut span = WORKING_HOURS;

    for day in days {
        let day_start = start_of_day(*day);
        let day_end = day_start + Duration::days(1);

        for event in events.iter().filter(|e| overlaps(e, day_start, day_end)) {
            let first = if event.start <= day_start { 0 } else { event.start.hour() };
            let last = if event.end >= day_end {
                24
            } else {
                let partial = event.end.minute() > 0 || event.end.second() > 0;
                event.end.hour() + u32::from(partial)
            };
            span.start = span.start.min(first);
            span.end = span.end.max(last);
        }
    }

    span
}

fn hour_start(day: NaiveDate, hour: u32) -> DateTime<Utc> {
    start_of_day(day) + Duration::hours(i64::from(hour))
}

fn column_width(columns: u16, days: usize) -> usize {
    let available = usize::from(columns).saturating_sub(GUTTER);
    (available / days.max(1)).saturating_sub(1).max(MIN_COLUMN_WIDTH)
}

/// Fit `text` into exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

fn render_grid(days: &[NaiveDate], events: &[Event], columns: u16, lines: &mut Vec<String>) {
    let width = column_width(columns, days.len());

    let header: Vec<String> = days
        .iter()
        .map(|d| fit(&d.format("%a %d").to_string(), width).bold().to_string())
        .collect();
    lines.push(format!("{}{}", " ".repeat(GUTTER), header.join(" ")));

    for hour in hour_span(days, events) {
        let cells: Vec<String> = days
            .iter()
            .map(|day| {
                let from = hour_start(*day, hour);
                let here: Vec<&Event> = events
                    .iter()
                    .filter(|e| overlaps(e, from, from + Duration::hours(1)))
                    .collect();
                render_cell(&here, width)
            })
            .collect();

        lines.push(format!("{:02}:00 {} {}", hour, "│".dimmed(), cells.join(" ")));
    }
}

fn render_cell(events: &[&Event], width: usize) -> String {
    match events {
        [] => fit("", width),
        [only] => chip(&fit(&only.title, width), palette::category_color(only.category)),
        [first, rest @ ..] => {
            let more = format!(" +{}", rest.len());
            let title_width = width.saturating_sub(more.chars().count());
            let text = format!("{}{}", fit(&first.title, title_width), more);
            chip(&text, palette::category_color(first.category))
        }
    }
}
