use crate::error::CoreError;
use crate::models::{Event, EventPatch, NewEventRow, SeriesMembership};
use crate::repository::{DeleteTarget, SqliteRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

const INSERT_EVENTS: &str = r#"INSERT INTO events (id, organization_id, title, description, start_date, end_date, location, event_type, is_philanthropy, audience, target_user_ids, created_by_user_id, recurrence_group_id, recurrence_index, recurrence_rule, created_at, updated_at) "#;

/// Rows per INSERT statement. Each row binds 17 values and SQLite caps a
/// statement at 32766 bound variables.
const INSERT_BATCH_ROWS: usize = 500;

#[async_trait]
impl super::EventStore for SqliteRepository {
    async fn bulk_insert(&self, rows: Vec<NewEventRow>) -> Result<Vec<Uuid>, CoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let ids: Vec<Uuid> = rows.iter().map(|_| Uuid::now_v7()).collect();

        let mut tx = self.pool().begin().await?;

        let mut pending = ids.iter().copied().zip(rows).peekable();
        while pending.peek().is_some() {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(INSERT_EVENTS);
            qb.push_values(pending.by_ref().take(INSERT_BATCH_ROWS), |mut b, (id, row)| {
                b.push_bind(id)
                    .push_bind(row.organization_id)
                    .push_bind(row.title)
                    .push_bind(row.description)
                    .push_bind(row.start_date)
                    .push_bind(row.end_date)
                    .push_bind(row.location)
                    .push_bind(row.event_type)
                    .push_bind(row.is_philanthropy)
                    .push_bind(row.audience)
                    .push_bind(row.target_user_ids.map(Json))
                    .push_bind(row.created_by_user_id)
                    .push_bind(row.recurrence_group_id)
                    .push_bind(row.recurrence_index)
                    .push_bind(row.recurrence_rule.map(Json))
                    .push_bind(now)
                    .push_bind(now);
            });
            qb.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::debug!(count = ids.len(), "inserted event rows");
        Ok(ids)
    }

    async fn find_series_member(&self, id: Uuid) -> Result<Option<SeriesMembership>, CoreError> {
        let membership = sqlx::query_as(
            "SELECT id, recurrence_group_id, recurrence_index FROM events WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(membership)
    }

    async fn update_where(
        &self,
        group_id: Uuid,
        position_gte: i64,
        start_gte: Option<DateTime<Utc>>,
        patch: &EventPatch,
    ) -> Result<Vec<Uuid>, CoreError> {
        if patch.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE events SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(title) = &patch.title {
                fields.push("title = ").push_bind_unseparated(title.clone());
            }
            if let Some(description) = &patch.description {
                fields.push("description = ").push_bind_unseparated(description.clone());
            }
            if let Some(location) = &patch.location {
                fields.push("location = ").push_bind_unseparated(location.clone());
            }
            if let Some(event_type) = &patch.event_type {
                fields.push("event_type = ").push_bind_unseparated(event_type.clone());
            }
            if let Some(is_philanthropy) = patch.is_philanthropy {
                fields.push("is_philanthropy = ").push_bind_unseparated(is_philanthropy);
            }
            fields.push("updated_at = ").push_bind_unseparated(Utc::now());
        }

        qb.push(" WHERE recurrence_group_id = ");
        qb.push_bind(group_id);
        qb.push(" AND recurrence_index >= ");
        qb.push_bind(position_gte);
        qb.push(" AND deleted_at IS NULL");
        if let Some(start_gte) = start_gte {
            qb.push(" AND start_date >= ");
            qb.push_bind(start_gte);
        }
        qb.push(" RETURNING id, recurrence_index");

        let ids = in_position_order(qb.build_query_as::<(Uuid, Option<i64>)>().fetch_all(self.pool()).await?);

        tracing::debug!(%group_id, position_gte, count = ids.len(), "updated event rows");
        Ok(ids)
    }

    async fn soft_delete_where(
        &self,
        target: DeleteTarget,
        deleted_at: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE events SET deleted_at = ");
        qb.push_bind(deleted_at);
        qb.push(", updated_at = ");
        qb.push_bind(deleted_at);
        qb.push(" WHERE deleted_at IS NULL");

        match target {
            DeleteTarget::Event(id) => {
                qb.push(" AND id = ");
                qb.push_bind(id);
            }
            DeleteTarget::Group { group_id, min_position } => {
                qb.push(" AND recurrence_group_id = ");
                qb.push_bind(group_id);
                if let Some(min_position) = min_position {
                    qb.push(" AND recurrence_index >= ");
                    qb.push_bind(min_position);
                }
            }
        }
        qb.push(" RETURNING id, recurrence_index");

        let ids = in_position_order(qb.build_query_as::<(Uuid, Option<i64>)>().fetch_all(self.pool()).await?);

        tracing::debug!(?target, count = ids.len(), "soft-deleted event rows");
        Ok(ids)
    }
}

/// SQLite gives no ordering guarantee for `RETURNING` rows.
fn in_position_order(mut rows: Vec<(Uuid, Option<i64>)>) -> Vec<Uuid> {
    rows.sort_by_key(|(_, position)| *position);
    rows.into_iter().map(|(id, _)| id).collect()
}

#[async_trait]
impl super::EventRepository for SqliteRepository {
    async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>, CoreError> {
        let event = sqlx::query_as("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(event)
    }

    async fn find_events_by_group(&self, group_id: Uuid, include_deleted: bool) -> Result<Vec<Event>, CoreError> {
        let sql = if include_deleted {
            "SELECT * FROM events WHERE recurrence_group_id = $1 ORDER BY recurrence_index"
        } else {
            "SELECT * FROM events WHERE recurrence_group_id = $1 AND deleted_at IS NULL ORDER BY recurrence_index"
        };
        let events = sqlx::query_as(sql)
            .bind(group_id)
            .fetch_all(self.pool())
            .await?;
        Ok(events)
    }

    async fn find_upcoming_events(&self, organization_id: Uuid, from: DateTime<Utc>, limit: i64) -> Result<Vec<Event>, CoreError> {
        let events = sqlx::query_as(
            r#"SELECT * FROM events
            WHERE organization_id = $1
            AND deleted_at IS NULL
            AND start_date >= $2
            ORDER BY start_date
            LIMIT $3"#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(events)
    }
}
