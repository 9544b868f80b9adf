use anyhow::{Context, Result};
use calboard::{CalendarView, EventApi, UpdateOutcome};
use calboard_core::Event;
use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;

/// Which part of the event a drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drag {
    /// The whole event; start and end shift together.
    Move,
    /// The end edge only.
    Resize,
}

pub async fn run<A: EventApi>(view: CalendarView<A>, drag: Drag, id: &str, by: &str) -> Result<()> {
    let offset = parse_offset(by)?;

    super::wait("Loading events...", view.refresh()).await?;

    let event = find_event(&view.store().events(), id)?;

    let (start, end) = shifted(&event, drag, offset)?;
    let handle = match drag {
        Drag::Move => view.drop_event(&event, start, end),
        Drag::Resize => view.resize_event(&event, start, end),
    };

    match super::wait("Updating event...", handle).await? {
        UpdateOutcome::Applied => {
            let updated = find_event(&view.store().events(), id)?;
            println!(
                "{}",
                format!(
                    "  Updated: {} {} – {}",
                    updated,
                    updated.start.format("%b %d %H:%M"),
                    updated.end.format("%b %d %H:%M")
                )
                .green()
            );
        }
        UpdateOutcome::Stale => {
            println!("{}", "  Saved, but the event is no longer listed".yellow());
        }
    }

    Ok(())
}

fn find_event(events: &[Event], id: &str) -> Result<Event> {
    events
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .with_context(|| format!("Event '{}' not found", id))
}

/// New start and end after dragging by `offset`.
fn shifted(event: &Event, drag: Drag, offset: Duration) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let shift = |dt: DateTime<Utc>| {
        dt.checked_add_signed(offset)
            .ok_or_else(|| anyhow::anyhow!("Offset moves the event out of range"))
    };

    match drag {
        Drag::Move => Ok((shift(event.start)?, shift(event.end)?)),
        Drag::Resize => Ok((event.start, shift(event.end)?)),
    }
}

/// Parse a signed human duration such as `1h`, `90min` or `-30m`.
fn parse_offset(input: &str) -> Result<Duration> {
    let (negative, magnitude) = match input.trim().strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, input.trim()),
    };

    let std_dur = humantime::parse_duration(magnitude)
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;

    Ok(if negative { -chrono_dur } else { chrono_dur })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_offset_forward() {
        assert_eq!(parse_offset("1h").unwrap(), Duration::hours(1));
        assert_eq!(parse_offset("90min").unwrap(), Duration::minutes(90));
    }

    #[test]
    fn parse_offset_backward() {
        assert_eq!(parse_offset("-30m").unwrap(), Duration::minutes(-30));
        assert_eq!(parse_offset(" -2h ").unwrap(), Duration::hours(-2));
    }

    fn meeting() -> Event {
        Event {
            id: "a".to_string(),
            title: "Meeting".to_string(),
            category: calboard_core::Category::Work,
            start: calboard_core::time::parse("2024-01-01T09:00:00.000Z").unwrap(),
            end: calboard_core::time::parse("2024-01-01T10:00:00.000Z").unwrap(),
        }
    }

    #[test]
    fn shifted_moves_both_edges_or_only_the_end() {
        let event = meeting();

        let (start, end) = shifted(&event, Drag::Move, Duration::hours(1)).unwrap();
        assert_eq!((start, end), (event.start + Duration::hours(1), event.end + Duration::hours(1)));

        let (start, end) = shifted(&event, Drag::Resize, Duration::minutes(30)).unwrap();
        assert_eq!((start, end), (event.start, event.end + Duration::minutes(30)));
    }

    #[test]
    fn huge_offsets_are_errors_not_panics() {
        let offset = parse_offset("1000000years").unwrap();

        let err = shifted(&meeting(), Drag::Move, offset).unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(shifted(&meeting(), Drag::Resize, -offset).is_err());
    }

    #[test]
    fn parse_offset_rejects_garbage() {
        assert!(parse_offset("soon").is_err());
        assert!(parse_offset("-").is_err());
    }
}
