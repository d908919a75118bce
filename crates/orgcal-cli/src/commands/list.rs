use anyhow::Result;
use chrono::Utc;
use orgcal_core::repository::{EventRepository, Repository};

use crate::cli::ListCommand;
use crate::parser::parse_timestamp;
use crate::views::table::display_events;

pub async fn list_events(repo: &impl Repository, command: ListCommand) -> Result<()> {
    let events = match (command.group, command.org) {
        (Some(group_id), _) => {
            repo.find_events_by_group(group_id, command.include_deleted)
                .await?
        }
        (None, Some(organization_id)) => {
            let from = match command.from {
                Some(from) => parse_timestamp(&from, Utc::now())?,
                None => Utc::now(),
            };
            repo.find_upcoming_events(organization_id, from, command.limit)
                .await?
        }
        (None, None) => Vec::new(),
    };

    display_events(&events);

    Ok(())
}
