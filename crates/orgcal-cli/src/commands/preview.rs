use anyhow::Result;
use chrono::Utc;
use orgcal_core::recurrence::{expand_with_limits, validate_anchor, ExpansionLimits};

use crate::cli::{PreviewCommand, ScheduleArgs};
use crate::parser::parse_timestamp;
use crate::util::plural;
use crate::views::table::display_instances;

pub fn preview_series(command: PreviewCommand, limits: &ExpansionLimits) -> Result<()> {
    let ScheduleArgs { start, end, rule, until } = command.schedule;
    let now = Utc::now();
    let start = parse_timestamp(&start, now)?;
    let end = end.map(|end| parse_timestamp(&end, now)).transpose()?;
    let rule = match until {
        Some(until) => rule.until(until),
        None => rule,
    };
    rule.validate()?;
    validate_anchor(start, end)?;

    let instances = expand_with_limits(start, end, &rule, limits);
    display_instances(&instances);
    println!("{}", plural(instances.len(), "instance"));

    Ok(())
}
