use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Hard ceiling on daily instances, applied regardless of the boundary date.
pub const DAILY_CAP: usize = 180;
/// Hard ceiling on weekly instances.
pub const WEEKLY_CAP: usize = 52;
/// Hard ceiling on monthly instances.
pub const MONTHLY_CAP: usize = 12;
/// Horizon used when a rule has no explicit `recurrence_end`.
pub const DEFAULT_HORIZON_MONTHS: u32 = 6;

/// How an anchor event repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "occurrence_type", rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly {
        /// Weekday indices, Sunday = 0 through Saturday = 6.
        /// Empty means the anchor's own weekday.
        #[serde(default)]
        days_of_week: Vec<u8>,
    },
    Monthly {
        /// `None` means the anchor's own day of month.
        #[serde(default)]
        day_of_month: Option<u32>,
    },
}

/// A recurrence rule: the repeat pattern plus an inclusive end date.
///
/// Serialized as a flat JSON object tagged by `occurrence_type`, which is the
/// shape persisted on the first row of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    #[serde(flatten)]
    pub frequency: Frequency,
    /// Last calendar day (UTC, inclusive) an instance may fall on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_end: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn daily() -> Self {
        Self {
            frequency: Frequency::Daily,
            recurrence_end: None,
        }
    }

    pub fn weekly<I>(days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        let days_of_week = days
            .into_iter()
            .map(|day| day.num_days_from_sunday() as u8)
            .collect();
        Self {
            frequency: Frequency::Weekly { days_of_week },
            recurrence_end: None,
        }
    }

    pub fn monthly(day_of_month: Option<u32>) -> Self {
        Self {
            frequency: Frequency::Monthly { day_of_month },
            recurrence_end: None,
        }
    }

    /// Sets the inclusive end date.
    pub fn until(mut self, recurrence_end: NaiveDate) -> Self {
        self.recurrence_end = Some(recurrence_end);
        self
    }

    /// Checks the variant parameters are within their calendar ranges.
    pub fn validate(&self) -> Result<(), CoreError> {
        match &self.frequency {
            Frequency::Daily => Ok(()),
            Frequency::Weekly { days_of_week } => {
                match days_of_week.iter().find(|day| **day > 6) {
                    Some(day) => Err(CoreError::InvalidInput(format!(
                        "day of week must be between 0 (Sunday) and 6 (Saturday), got {}",
                        day
                    ))),
                    None => Ok(()),
                }
            }
            Frequency::Monthly { day_of_month: Some(day) } if !(1..=31).contains(day) => {
                Err(CoreError::InvalidInput(format!(
                    "day of month must be between 1 and 31, got {}",
                    day
                )))
            }
            Frequency::Monthly { .. } => Ok(()),
        }
    }

    /// Absolute instant after which no instance may start.
    ///
    /// The end of the `recurrence_end` UTC day when set, otherwise
    /// `horizon_months` calendar months after the anchor.
    pub fn boundary(&self, anchor_start: DateTime<Utc>, horizon_months: u32) -> DateTime<Utc> {
        match self.recurrence_end {
            Some(date) => match date.and_hms_milli_opt(23, 59, 59, 999) {
                Some(end_of_day) => end_of_day.and_utc(),
                None => DateTime::<Utc>::MAX_UTC,
            },
            None => anchor_start
                .checked_add_months(Months::new(horizon_months))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Invalid recurrence rule '{0}': expected daily, weekly[:mon,wed,...] or monthly[:1-31]")]
pub struct ParseRecurrenceRuleError(String);

impl FromStr for RecurrenceRule {
    type Err = ParseRecurrenceRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseRecurrenceRuleError(s.to_string());
        let lowered = s.trim().to_lowercase();
        let (kind, args) = match lowered.split_once(':') {
            Some((kind, args)) => (kind, Some(args.trim())),
            None => (lowered.as_str(), None),
        };

        match (kind, args) {
            ("daily", None) => Ok(RecurrenceRule::daily()),
            ("weekly", None) => Ok(RecurrenceRule::weekly([])),
            ("weekly", Some(days)) => {
                let days = days
                    .split(',')
                    .map(|day| day.trim().parse::<Weekday>().map_err(|_| invalid()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(RecurrenceRule::weekly(days))
            }
            ("monthly", None) => Ok(RecurrenceRule::monthly(None)),
            ("monthly", Some(day)) => {
                let day: u32 = day.parse().map_err(|_| invalid())?;
                if !(1..=31).contains(&day) {
                    return Err(invalid());
                }
                Ok(RecurrenceRule::monthly(Some(day)))
            }
            _ => Err(invalid()),
        }
    }
}

/// Per-variant caps and the default horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionLimits {
    pub daily_cap: usize,
    pub weekly_cap: usize,
    pub monthly_cap: usize,
    pub default_horizon_months: u32,
}

impl Default for ExpansionLimits {
    fn default() -> Self {
        Self {
            daily_cap: DAILY_CAP,
            weekly_cap: WEEKLY_CAP,
            monthly_cap: MONTHLY_CAP,
            default_horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

/// One concrete occurrence produced by expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventInstance {
    pub start: DateTime<Utc>,
    /// Present exactly when the anchor had an end
    pub end: Option<DateTime<Utc>>,
    /// Zero-based emission order; the anchor is 0
    pub position: u32,
}

/// Rejects an anchor whose end is before its start.
pub fn validate_anchor(
    anchor_start: DateTime<Utc>,
    anchor_end: Option<DateTime<Utc>>,
) -> Result<(), CoreError> {
    match anchor_end {
        Some(end) if end < anchor_start => Err(CoreError::InvalidInput(format!(
            "end time {} must not be before the start time {}",
            end.to_rfc3339(),
            anchor_start.to_rfc3339()
        ))),
        _ => Ok(()),
    }
}

/// Expands an anchor event into its ordered, capped instances using the
/// default limits.
pub fn expand(
    anchor_start: DateTime<Utc>,
    anchor_end: Option<DateTime<Utc>>,
    rule: &RecurrenceRule,
) -> Vec<EventInstance> {
    expand_with_limits(anchor_start, anchor_end, rule, &ExpansionLimits::default())
}

/// Expands an anchor event into its ordered, capped instances.
///
/// # Behavior
/// - The anchor is always emitted first, at position 0
/// - Every instance keeps the anchor's UTC time of day and duration
/// - Nothing is emitted before the anchor or after the rule's boundary
/// - Each variant stops at its cap even if the boundary is further out;
///   a cap of zero yields no instances at all
pub fn expand_with_limits(
    anchor_start: DateTime<Utc>,
    anchor_end: Option<DateTime<Utc>>,
    rule: &RecurrenceRule,
    limits: &ExpansionLimits,
) -> Vec<EventInstance> {
    let cap = match &rule.frequency {
        Frequency::Daily => limits.daily_cap,
        Frequency::Weekly { .. } => limits.weekly_cap,
        Frequency::Monthly { .. } => limits.monthly_cap,
    };
    let mut emitter = Emitter::new(anchor_start, anchor_end);
    if cap == 0 {
        return emitter.into_instances();
    }
    emitter.emit(anchor_start);

    let boundary = rule.boundary(anchor_start, limits.default_horizon_months);
    let remaining = cap - emitter.len();
    let anchor_date = anchor_start.date_naive();
    match &rule.frequency {
        Frequency::Daily => {
            let starts: Vec<_> = anchor_date
                .iter_days()
                .skip(1)
                .map(|date| emitter.at_anchor_time(date))
                .take_while(|start| *start <= boundary)
                .take(remaining)
                .collect();
            emitter.extend(starts);
        }
        Frequency::Weekly { days_of_week } => {
            let days: Vec<u8> = if days_of_week.is_empty() {
                vec![weekday_index(anchor_start)]
            } else {
                days_of_week.clone()
            };
            let starts: Vec<_> = anchor_date
                .iter_days()
                .map(|date| emitter.at_anchor_time(date))
                .skip_while(|start| *start <= anchor_start)
                .take_while(|start| *start <= boundary)
                .filter(|start| days.contains(&weekday_index(*start)))
                .take(remaining)
                .collect();
            emitter.extend(starts);
        }
        Frequency::Monthly { day_of_month } => {
            let requested_day = day_of_month.unwrap_or_else(|| anchor_start.day());
            let Some(first_month) = anchor_date.with_day(1) else {
                return emitter.into_instances();
            };
            let starts: Vec<_> = (0u32..)
                .map_while(|offset| first_month.checked_add_months(Months::new(offset)))
                .filter_map(|month| month.with_day(requested_day.clamp(1, days_in_month(month))))
                .map(|date| emitter.at_anchor_time(date))
                .take_while(|start| *start <= boundary)
                .filter(|start| *start > anchor_start)
                .take(remaining)
                .collect();
            emitter.extend(starts);
        }
    }

    emitter.into_instances()
}

/// Assigns positions and ends to instance starts as they are emitted.
struct Emitter {
    time_of_day: NaiveTime,
    duration: Option<TimeDelta>,
    instances: Vec<EventInstance>,
}

impl Emitter {
    fn new(anchor_start: DateTime<Utc>, anchor_end: Option<DateTime<Utc>>) -> Self {
        Self {
            time_of_day: anchor_start.time(),
            duration: anchor_end.map(|end| end - anchor_start),
            instances: Vec::new(),
        }
    }

    #[inline]
    fn at_anchor_time(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_time(self.time_of_day).and_utc()
    }

    fn len(&self) -> usize {
        self.instances.len()
    }

    fn emit(&mut self, start: DateTime<Utc>) {
        let position = self.instances.len() as u32;
        self.instances.push(EventInstance {
            start,
            end: self.duration.map(|duration| start + duration),
            position,
        });
    }

    fn extend(&mut self, starts: Vec<DateTime<Utc>>) {
        for start in starts {
            self.emit(start);
        }
    }

    fn into_instances(self) -> Vec<EventInstance> {
        self.instances
    }
}

#[inline]
fn weekday_index(instant: DateTime<Utc>) -> u8 {
    instant.weekday().num_days_from_sunday() as u8
}

/// Number of days in the month starting at `first_of_month`.
fn days_in_month(first_of_month: NaiveDate) -> u32 {
    first_of_month
        .checked_add_months(Months::new(1))
        .and_then(|next_month| next_month.checked_sub_days(Days::new(1)))
        .map(|last_day| last_day.day())
        .unwrap_or(31)
}
