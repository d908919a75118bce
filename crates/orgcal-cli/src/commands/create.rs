use anyhow::Result;
use chrono::Utc;
use orgcal_core::models::NewEventData;
use orgcal_core::repository::{EventRepository, Repository};
use orgcal_core::series::{SeriesMutator, UuidV7Generator};
use owo_colors::OwoColorize;

use crate::cli::{CreateCommand, ScheduleArgs};
use crate::parser::parse_timestamp;
use crate::util::plural;
use crate::views::table::display_events;

pub async fn create_series<R: Repository>(mutator: &SeriesMutator<R>, command: CreateCommand) -> Result<()> {
    let ScheduleArgs { start, end, rule, until } = command.schedule;
    let now = Utc::now();
    let start_date = parse_timestamp(&start, now)?;
    let end_date = end.map(|end| parse_timestamp(&end, now)).transpose()?;
    let rule = match until {
        Some(until) => rule.until(until),
        None => rule,
    };

    let data = NewEventData {
        organization_id: command.org,
        title: command.title,
        description: command.description,
        start_date,
        end_date,
        location: command.location,
        event_type: command.category,
        is_philanthropy: command.philanthropy,
        audience: command.audience,
        target_user_ids: (!command.target.is_empty()).then_some(command.target),
        created_by_user_id: command.created_by,
    };

    let created = mutator.create(data, &rule, &UuidV7Generator).await?;

    println!(
        "{} Created series {} with {}",
        "✓".green(),
        created.group_id,
        plural(created.event_ids.len(), "event")
    );
    let events = mutator
        .store()
        .find_events_by_group(created.group_id, false)
        .await?;
    display_events(&events);

    Ok(())
}
