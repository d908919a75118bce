use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{DeleteScope, EventPatch, NewEventData, NewEventRow, SeriesCreated, SeriesMembership};
use crate::recurrence::{expand_with_limits, validate_anchor, EventInstance, ExpansionLimits, RecurrenceRule};
use crate::repository::{DeleteTarget, EventStore};

/// Source of fresh series identities.
///
/// Any `Fn() -> Uuid` closure is a generator, which lets tests pin group ids.
pub trait GroupIdGenerator: Send + Sync {
    fn next_group_id(&self) -> Uuid;
}

impl<F> GroupIdGenerator for F
where
    F: Fn() -> Uuid + Send + Sync,
{
    fn next_group_id(&self) -> Uuid {
        self()
    }
}

/// Time-ordered random group ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl GroupIdGenerator for UuidV7Generator {
    fn next_group_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}

/// SeriesMutator: creates recurring series and applies scope-qualified
/// updates and deletes to them.
///
/// Responsibilities:
/// 1. Expand an anchor event and persist the series in one bulk insert
/// 2. Tag every row with the shared group id and its position
/// 3. Resolve an instance to its group before any group-scoped change
/// 4. Leave soft-deleted rows out of every scope
///
/// Each operation issues its store calls sequentially. Nothing serializes
/// operations on the same group; concurrent callers race at the store.
pub struct SeriesMutator<S> {
    store: S,
    limits: ExpansionLimits,
}

impl<S: EventStore> SeriesMutator<S> {
    pub fn new(store: S) -> Self {
        Self::with_limits(store, ExpansionLimits::default())
    }

    pub fn with_limits(store: S, limits: ExpansionLimits) -> Self {
        Self { store, limits }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn limits(&self) -> &ExpansionLimits {
        &self.limits
    }

    /// Creates a series from an anchor event and a recurrence rule.
    ///
    /// # Returns
    /// * `Result<SeriesCreated, CoreError>` - group id and row ids in position order
    ///
    /// # Behavior
    /// - Rejects an invalid rule or an anchor ending before it starts
    ///   before expanding
    /// - Returns `EmptyExpansion` without touching the store if no instance is produced
    /// - Stores the rule only on the position 0 row
    /// - Store failures are returned as-is; the insert is never retried
    pub async fn create(
        &self,
        base: NewEventData,
        rule: &RecurrenceRule,
        ids: &dyn GroupIdGenerator,
    ) -> Result<SeriesCreated, CoreError> {
        rule.validate()?;
        validate_anchor(base.start_date, base.end_date)?;

        let instances = expand_with_limits(base.start_date, base.end_date, rule, &self.limits);
        if instances.is_empty() {
            tracing::warn!(title = %base.title, "recurrence rule produced no instances");
            return Err(CoreError::EmptyExpansion);
        }

        let group_id = ids.next_group_id();
        let rows: Vec<NewEventRow> = instances
            .iter()
            .map(|instance| series_row(&base, instance, group_id, rule))
            .collect();

        let event_ids = self.store.bulk_insert(rows).await?;

        tracing::info!(%group_id, count = event_ids.len(), "created event series");
        Ok(SeriesCreated { group_id, event_ids })
    }

    /// Applies `patch` to the named instance and every later instance that
    /// has not started yet.
    ///
    /// Rows whose position qualifies but whose start is before `now` are
    /// left untouched.
    pub async fn update_future(
        &self,
        instance_id: Uuid,
        patch: &EventPatch,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, CoreError> {
        if patch.is_empty() {
            return Err(CoreError::InvalidInput("patch contains no fields to update".to_string()));
        }

        let (group_id, position) = self.resolve_series(instance_id).await?;
        tracing::debug!(%instance_id, %group_id, position, "updating this and future instances");

        let updated = self
            .store
            .update_where(group_id, position, Some(now), patch)
            .await?;

        tracing::info!(%group_id, count = updated.len(), "updated series instances");
        Ok(updated)
    }

    /// Soft-deletes instances of a series relative to one named instance.
    ///
    /// `ThisAndFuture` has no time filter: past instances at or after the
    /// resolved position are deleted too, unlike `update_future`.
    pub async fn delete_in_series(
        &self,
        instance_id: Uuid,
        scope: DeleteScope,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, CoreError> {
        let target = match scope {
            DeleteScope::ThisOnly => DeleteTarget::Event(instance_id),
            DeleteScope::ThisAndFuture => {
                let (group_id, position) = self.resolve_series(instance_id).await?;
                DeleteTarget::Group {
                    group_id,
                    min_position: Some(position),
                }
            }
            DeleteScope::AllInSeries => {
                let (group_id, _) = self.resolve_series(instance_id).await?;
                DeleteTarget::Group {
                    group_id,
                    min_position: None,
                }
            }
        };
        tracing::debug!(%instance_id, %scope, ?target, "deleting series instances");

        let deleted = self.store.soft_delete_where(target, now).await?;

        tracing::info!(%instance_id, %scope, count = deleted.len(), "deleted series instances");
        Ok(deleted)
    }

    /// Resolves a live row to `(group_id, position)`. A row missing either
    /// half is not a series member.
    async fn resolve_series(&self, instance_id: Uuid) -> Result<(Uuid, i64), CoreError> {
        match self.store.find_series_member(instance_id).await? {
            Some(SeriesMembership {
                recurrence_group_id: Some(group_id),
                recurrence_index: Some(position),
                ..
            }) => Ok((group_id, position)),
            _ => Err(CoreError::NotInSeries(instance_id)),
        }
    }
}

/// Builds the stored row for one expanded instance.
fn series_row(
    base: &NewEventData,
    instance: &EventInstance,
    group_id: Uuid,
    rule: &RecurrenceRule,
) -> NewEventRow {
    NewEventRow {
        start_date: instance.start,
        end_date: instance.end,
        recurrence_group_id: Some(group_id),
        recurrence_index: Some(i64::from(instance.position)),
        recurrence_rule: (instance.position == 0).then(|| rule.clone()),
        ..NewEventRow::from_anchor(base)
    }
}
