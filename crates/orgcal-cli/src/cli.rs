use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use orgcal_core::models::{Audience, DeleteScope};
use orgcal_core::recurrence::RecurrenceRule;
use uuid::Uuid;

/// Operator tool for recurring organization events
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the instances a rule would produce without saving anything
    Preview(PreviewCommand),
    /// Create a recurring event series
    Create(CreateCommand),
    /// List events of a series or an organization's upcoming events
    List(ListCommand),
    /// Edit an event and every upcoming event after it in its series
    Edit(EditCommand),
    /// Delete events of a series
    Delete(DeleteCommand),
}

/// Anchor and recurrence arguments shared by `preview` and `create`
#[derive(Args, Debug, Clone)]
pub struct ScheduleArgs {
    /// Start of the anchor event (RFC 3339 or natural language)
    #[arg(long)]
    pub start: String,
    /// End of the anchor event
    #[arg(long)]
    pub end: Option<String>,
    /// Recurrence rule
    #[arg(long, help = "Recurrence rule: daily, weekly[:mon,wed,...] or monthly[:1-31]")]
    pub rule: RecurrenceRule,
    /// Last day (inclusive, UTC) an instance may fall on
    #[arg(long, help = "Last day an instance may fall on (e.g., '2025-12-31')")]
    pub until: Option<NaiveDate>,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    #[command(flatten)]
    pub schedule: ScheduleArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct CreateCommand {
    /// The title of the event
    pub title: String,
    /// Owning organization
    #[arg(long)]
    pub org: Uuid,
    #[command(flatten)]
    pub schedule: ScheduleArgs,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long)]
    pub location: Option<String>,
    /// Event category
    #[arg(long, default_value = "general")]
    pub category: String,
    /// Mark the events as philanthropy
    #[arg(long)]
    pub philanthropy: bool,
    /// Who the events are for (members, alumni, both, specific)
    #[arg(long, default_value = "both")]
    pub audience: Audience,
    /// Explicit user ids for the `specific` audience
    #[arg(long, num_args = 1..)]
    pub target: Vec<Uuid>,
    /// User creating the series
    #[arg(long)]
    pub created_by: Option<Uuid>,
}

#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["group", "org"])))]
pub struct ListCommand {
    /// List every event of one series, in position order
    #[arg(long)]
    pub group: Option<Uuid>,
    /// Include soft-deleted events (with --group)
    #[arg(long, conflicts_with = "org")]
    pub include_deleted: bool,
    /// List an organization's upcoming events
    #[arg(long)]
    pub org: Option<Uuid>,
    /// Only events starting at or after this time (with --org)
    #[arg(long, conflicts_with = "group")]
    pub from: Option<String>,
    /// Maximum number of upcoming events
    #[arg(long, default_value_t = 20)]
    pub limit: i64,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the first event to edit
    pub id: Uuid,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,

    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, conflicts_with = "location")]
    pub location_clear: bool,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub philanthropy: Option<bool>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the event the scope is relative to
    pub id: Uuid,
    /// Which events to delete (this|future|all)
    #[arg(long, default_value = "this")]
    pub scope: DeleteScope,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}
