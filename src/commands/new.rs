use anyhow::{Context, Result};
use calboard::{CalendarView, EventApi, Slot};
use calboard_core::{Category, time};
use chrono::{DateTime, Utc};
use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;

pub async fn run<A: EventApi>(
    mut view: CalendarView<A>,
    title: Option<String>,
    category: Option<Category>,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    let interactive = title.is_none() || start.is_none();

    // --- Slot ---
    let start = match start {
        Some(s) => time::parse(&s).with_context(|| format!("Invalid start time: \"{}\"", s))?,
        None => prompt_with_retry("  Start (YYYY-MM-DDTHH:MM)")?,
    };
    let slot = match end {
        Some(e) => Slot {
            start,
            end: time::parse(&e).with_context(|| format!("Invalid end time: \"{}\"", e))?,
        },
        None => Slot::starting_at(start),
    };

    view.select_slot(slot);

    // --- Title ---
    let title = match title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };
    view.dialog_mut().set_title(title);

    // --- Category ---
    let category = match category {
        Some(c) => c,
        None if interactive => {
            let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
            match Select::new()
                .with_prompt("  Category")
                .items(&labels)
                .default(0)
                .interact_opt()?
            {
                Some(index) => Category::ALL[index],
                None => return cancel(&mut view),
            }
        }
        None => Category::default(),
    };
    view.dialog_mut().set_category(category);

    if interactive {
        let dialog = view.dialog();
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "  Create \"{}\" ({}) {} → {}?",
                dialog.title, dialog.category, dialog.start, dialog.end
            ))
            .default(true)
            .interact_opt()?;
        if confirmed != Some(true) {
            return cancel(&mut view);
        }
    }

    let title = view.dialog().title.clone();
    let handle = view.submit_dialog()?;
    let event = super::wait("Creating event...", handle).await?;

    if interactive {
        println!();
    }
    println!("{}", format!("  Created: {} ({})", title, event.id).green());

    Ok(())
}

fn cancel<A: EventApi>(view: &mut CalendarView<A>) -> Result<()> {
    view.dialog_mut().cancel();
    println!("{}", "  Cancelled".dimmed());
    Ok(())
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry(prompt: &str) -> Result<DateTime<Utc>> {
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match time::parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}
