use anyhow::Result;
use chrono::Utc;
use orgcal_core::models::EventPatch;
use orgcal_core::repository::Repository;
use orgcal_core::series::SeriesMutator;
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::util::plural;

pub async fn edit_series<R: Repository>(mutator: &SeriesMutator<R>, command: EditCommand) -> Result<()> {
    let description = if command.description_clear {
        Some(None)
    } else {
        command.description.map(Some)
    };

    let location = if command.location_clear {
        Some(None)
    } else {
        command.location.map(Some)
    };

    let patch = EventPatch {
        title: command.title,
        description,
        location,
        event_type: command.category,
        is_philanthropy: command.philanthropy,
    };

    let updated = mutator.update_future(command.id, &patch, Utc::now()).await?;

    if updated.is_empty() {
        println!("{}", "No upcoming events matched; nothing was changed.".yellow());
    } else {
        println!("{} Updated {}", "✓".green(), plural(updated.len(), "upcoming event"));
    }

    Ok(())
}
