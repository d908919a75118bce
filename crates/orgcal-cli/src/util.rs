use anyhow::{anyhow, Result};
use orgcal_core::error::CoreError;
use orgcal_core::models::Event;
use orgcal_core::repository::{EventRepository, Repository};
use uuid::Uuid;

/// Looks up a live event, turning a miss into `CoreError::NotFound`.
pub async fn find_live_event(repo: &impl Repository, id: Uuid) -> Result<Event> {
    match repo.find_event_by_id(id).await? {
        Some(event) if !event.is_deleted() => Ok(event),
        _ => Err(anyhow!(CoreError::NotFound(format!(
            "No event found with ID '{}'",
            id
        )))),
    }
}

pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
