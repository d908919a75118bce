use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::recurrence::RecurrenceRule;

/// Who an event is addressed to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Members,
    Alumni,
    #[default]
    Both,
    /// Only the explicit `target_user_ids` list.
    Specific,
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Audience::Members => write!(f, "members"),
            Audience::Alumni => write!(f, "alumni"),
            Audience::Both => write!(f, "both"),
            Audience::Specific => write!(f, "specific"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid audience: {0}")]
pub struct ParseAudienceError(String);

impl FromStr for Audience {
    type Err = ParseAudienceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "members" => Ok(Audience::Members),
            "alumni" => Ok(Audience::Alumni),
            "both" | "all" => Ok(Audience::Both),
            "specific" => Ok(Audience::Specific),
            _ => Err(ParseAudienceError(s.to_string())),
        }
    }
}

/// A stored event row. Rows of one series share `recurrence_group_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    /// Category tag (e.g. "general", "social", "meeting")
    pub event_type: String,
    pub is_philanthropy: bool,
    pub audience: Audience,
    pub target_user_ids: Option<Json<Vec<Uuid>>>,
    pub created_by_user_id: Option<Uuid>,
    /// Series identity, shared by every instance of the same series
    pub recurrence_group_id: Option<Uuid>,
    /// Zero-based position within the series
    pub recurrence_index: Option<i64>,
    /// Only present on the position 0 row
    pub recurrence_rule: Option<Json<RecurrenceRule>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_date.map(|end| end - self.start_date)
    }
}

/// Attributes of the anchor event a series is created from.
#[derive(Debug, Clone)]
pub struct NewEventData {
    pub organization_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub event_type: String,
    pub is_philanthropy: bool,
    pub audience: Audience,
    pub target_user_ids: Option<Vec<Uuid>>,
    pub created_by_user_id: Option<Uuid>,
}

impl Default for NewEventData {
    fn default() -> Self {
        Self {
            organization_id: Uuid::nil(),
            title: String::new(),
            description: None,
            start_date: Utc::now(),
            end_date: None,
            location: None,
            event_type: "general".to_string(),
            is_philanthropy: false,
            audience: Audience::default(),
            target_user_ids: None,
            created_by_user_id: None,
        }
    }
}

/// A fully-built row handed to the store for insertion.
#[derive(Debug, Clone)]
pub struct NewEventRow {
    pub organization_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub event_type: String,
    pub is_philanthropy: bool,
    pub audience: Audience,
    pub target_user_ids: Option<Vec<Uuid>>,
    pub created_by_user_id: Option<Uuid>,
    pub recurrence_group_id: Option<Uuid>,
    pub recurrence_index: Option<i64>,
    pub recurrence_rule: Option<RecurrenceRule>,
}

impl NewEventRow {
    /// A standalone row carrying the anchor attributes and no series metadata.
    pub fn from_anchor(data: &NewEventData) -> Self {
        Self {
            organization_id: data.organization_id,
            title: data.title.clone(),
            description: data.description.clone(),
            start_date: data.start_date,
            end_date: data.end_date,
            location: data.location.clone(),
            event_type: data.event_type.clone(),
            is_philanthropy: data.is_philanthropy,
            audience: data.audience,
            target_user_ids: data.target_user_ids.clone(),
            created_by_user_id: data.created_by_user_id,
            recurrence_group_id: None,
            recurrence_index: None,
            recurrence_rule: None,
        }
    }
}

/// Fields a series-wide update may touch. Schedule and series metadata are
/// not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub event_type: Option<String>,
    pub is_philanthropy: Option<bool>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.event_type.is_none()
            && self.is_philanthropy.is_none()
    }
}

/// Group identity and position of a live row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SeriesMembership {
    pub id: Uuid,
    pub recurrence_group_id: Option<Uuid>,
    pub recurrence_index: Option<i64>,
}

/// Result of creating a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCreated {
    pub group_id: Uuid,
    /// Row ids in position order
    pub event_ids: Vec<Uuid>,
}

/// Breadth of a delete relative to one named instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteScope {
    /// Only the named instance
    ThisOnly,
    /// The named instance and every later position, past or future
    ThisAndFuture,
    /// Every live instance of the series
    AllInSeries,
}

impl std::fmt::Display for DeleteScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteScope::ThisOnly => write!(f, "this_only"),
            DeleteScope::ThisAndFuture => write!(f, "this_and_future"),
            DeleteScope::AllInSeries => write!(f, "all_in_series"),
        }
    }
}

impl FromStr for DeleteScope {
    type Err = ParseDeleteScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "this" | "this_only" | "occurrence" => Ok(DeleteScope::ThisOnly),
            "future" | "this_and_future" => Ok(DeleteScope::ThisAndFuture),
            "all" | "all_in_series" | "series" => Ok(DeleteScope::AllInSeries),
            _ => Err(ParseDeleteScopeError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid delete scope: {0}")]
pub struct ParseDeleteScopeError(String);
