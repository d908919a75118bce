use chrono::{DateTime, Duration, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use orgcal_core::models::Event;
use orgcal_core::recurrence::EventInstance;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn format_duration(duration: Option<Duration>) -> String {
    match duration {
        None => "-".to_string(),
        Some(d) if d.num_minutes() % 60 == 0 => format!("{}h", d.num_hours()),
        Some(d) if d.num_hours() == 0 => format!("{}m", d.num_minutes()),
        Some(d) => format!("{}h {}m", d.num_hours(), d.num_minutes() % 60),
    }
}

fn start_cell(start: DateTime<Utc>, now: DateTime<Utc>) -> Cell {
    let text = format!("{} ({})", start.format(TIME_FORMAT), start.humanize());
    if start < now {
        Cell::new(text).fg(Color::DarkGrey)
    } else {
        Cell::new(text)
    }
}

/// Instances produced by a rule, before anything is saved.
pub fn display_instances(instances: &[EventInstance]) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Starts", "Ends", "Day"]);

    for instance in instances {
        let mut row = Row::new();
        row.add_cell(Cell::new(instance.position));
        row.add_cell(Cell::new(instance.start.format(TIME_FORMAT)));
        row.add_cell(Cell::new(
            instance
                .end
                .map(|end| end.format(TIME_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string()),
        ));
        row.add_cell(Cell::new(instance.start.format("%a")));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_events(events: &[Event]) {
    if events.is_empty() {
        println!("No events found.");
        return;
    }

    let now = Utc::now();
    let mut table = Table::new();
    table.set_header(vec!["ID", "#", "Title", "Starts", "Length", "Location", "Category"]);

    for event in events {
        let mut row = Row::new();
        row.add_cell(Cell::new(event.id));
        row.add_cell(Cell::new(
            event
                .recurrence_index
                .map(|index| index.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ));

        let mut title = event.title.clone();
        if event.recurrence_group_id.is_some() {
            title.insert_str(0, "↻ ");
        }
        if event.is_philanthropy {
            title.push_str(" ♥");
        }
        let title_cell = if event.is_deleted() {
            Cell::new(format!("{} (deleted)", title))
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey)
        } else {
            Cell::new(title)
        };
        row.add_cell(title_cell);

        row.add_cell(start_cell(event.start_date, now));
        row.add_cell(Cell::new(format_duration(event.duration())));
        row.add_cell(Cell::new(event.location.as_deref().unwrap_or("None")));
        row.add_cell(Cell::new(&event.event_type));
        table.add_row(row);
    }

    println!("{table}");
}
