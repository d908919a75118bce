use anyhow::Result;
use chrono::Utc;
use orgcal_core::models::{DeleteScope, Event};
use orgcal_core::repository::Repository;
use orgcal_core::series::SeriesMutator;
use owo_colors::OwoColorize;

use crate::util::plural;

pub fn confirmation_prompt(event: &Event, scope: DeleteScope) -> String {
    let when = event.start_date.format("%Y-%m-%d %H:%M");
    match scope {
        DeleteScope::ThisOnly => format!("Delete '{}' on {}?", event.title, when),
        DeleteScope::ThisAndFuture => format!(
            "Delete '{}' on {} and every later event in its series?",
            event.title, when
        ),
        DeleteScope::AllInSeries => format!("Delete every event in the '{}' series?", event.title),
    }
}

pub async fn delete_events<R: Repository>(mutator: &SeriesMutator<R>, event: &Event, scope: DeleteScope) -> Result<()> {
    let deleted = mutator.delete_in_series(event.id, scope, Utc::now()).await?;

    println!("{} Deleted {}", "✓".green(), plural(deleted.len(), "event"));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use orgcal_core::models::Audience;
    use uuid::Uuid;

    fn event() -> Event {
        let start = Utc.with_ymd_and_hms(2025, 3, 4, 19, 0, 0).unwrap();
        Event {
            id: Uuid::nil(),
            organization_id: Uuid::nil(),
            title: "Chapter".to_string(),
            description: None,
            start_date: start,
            end_date: None,
            location: None,
            event_type: "meeting".to_string(),
            is_philanthropy: false,
            audience: Audience::Both,
            target_user_ids: None,
            created_by_user_id: None,
            recurrence_group_id: Some(Uuid::nil()),
            recurrence_index: Some(3),
            recurrence_rule: None,
            created_at: start,
            updated_at: start,
            deleted_at: None,
        }
    }

    #[test]
    fn test_prompt_names_the_scope() {
        assert_eq!(
            confirmation_prompt(&event(), DeleteScope::ThisOnly),
            "Delete 'Chapter' on 2025-03-04 19:00?"
        );
        assert!(confirmation_prompt(&event(), DeleteScope::ThisAndFuture).contains("every later event"));
        assert!(confirmation_prompt(&event(), DeleteScope::AllInSeries).contains("every event"));
    }
}
