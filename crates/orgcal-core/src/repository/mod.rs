use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{Event, EventPatch, NewEventRow, SeriesMembership};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod events;

/// Which live rows a soft delete applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Exactly one row
    Event(Uuid),
    /// Rows of a series, optionally only those at or after a position
    Group {
        group_id: Uuid,
        min_position: Option<i64>,
    },
}

/// The narrow store interface the series engine depends on.
///
/// Every method is a single request/response round trip. Implementations
/// must ignore soft-deleted rows in every lookup and filter.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts all rows or none, returning their ids in input order.
    async fn bulk_insert(&self, rows: Vec<NewEventRow>) -> Result<Vec<Uuid>, CoreError>;

    /// Resolves a live row to its series membership.
    async fn find_series_member(&self, id: Uuid) -> Result<Option<SeriesMembership>, CoreError>;

    /// Applies `patch` to live rows of `group_id` with `position >= position_gte`
    /// and, when given, `start_date >= start_gte`. Returns ids in position order.
    async fn update_where(
        &self,
        group_id: Uuid,
        position_gte: i64,
        start_gte: Option<DateTime<Utc>>,
        patch: &EventPatch,
    ) -> Result<Vec<Uuid>, CoreError>;

    /// Stamps `deleted_at` on the live rows selected by `target`, returning
    /// their ids in position order.
    async fn soft_delete_where(
        &self,
        target: DeleteTarget,
        deleted_at: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, CoreError>;
}

/// Read-side queries used by operators and tests
#[async_trait]
pub trait EventRepository {
    async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>, CoreError>;
    async fn find_events_by_group(&self, group_id: Uuid, include_deleted: bool) -> Result<Vec<Event>, CoreError>;
    async fn find_upcoming_events(&self, organization_id: Uuid, from: DateTime<Utc>, limit: i64) -> Result<Vec<Event>, CoreError>;
}

/// Main repository trait that composes the write and read sides
pub trait Repository: EventStore + EventRepository {}

/// SQLite implementation of the repository pattern
#[derive(Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
