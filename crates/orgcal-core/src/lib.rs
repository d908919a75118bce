//! # Orgcal Core Library
//!
//! Recurring-event engine for organization calendars: expands an anchor event
//! into a capped series of concrete instances and applies scope-qualified
//! edits and deletes to that series.
//!
//! ## Features
//!
//! - **Recurrence Expansion**: Daily, weekly and monthly rules with per-variant
//!   caps, month-end clamping and a default horizon
//! - **Materialized Series**: Every instance is a real row tagged with a shared
//!   group id and its position
//! - **Scoped Mutations**: "this and future" edits and this/future/all deletes
//! - **Soft Deletes**: Deleted rows keep their data and drop out of every scope
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Event rows, patches and delete scopes
//! - [`recurrence`]: Recurrence rules and the expansion engine
//! - [`repository`]: Store traits and the SQLite implementation
//! - [`series`]: Series creation, update and delete orchestration
//! - [`error`]: Error types shared by every module
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::{Duration, TimeZone, Utc, Weekday};
//! use orgcal_core::{
//!     db, error::CoreError, models::NewEventData, recurrence::RecurrenceRule,
//!     repository::SqliteRepository, series::{SeriesMutator, UuidV7Generator},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CoreError> {
//!     let pool = db::establish_connection("orgcal.db").await?;
//!     let mutator = SeriesMutator::new(SqliteRepository::new(pool));
//!
//!     let start = Utc.with_ymd_and_hms(2025, 1, 6, 18, 0, 0).unwrap();
//!     let anchor = NewEventData {
//!         title: "Chapter meeting".to_string(),
//!         start_date: start,
//!         end_date: Some(start + Duration::hours(1)),
//!         ..Default::default()
//!     };
//!     let rule = RecurrenceRule::weekly([Weekday::Mon, Weekday::Wed]);
//!
//!     let created = mutator.create(anchor, &rule, &UuidV7Generator).await?;
//!     println!("Created {} events in series {}", created.event_ids.len(), created.group_id);
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod series;
