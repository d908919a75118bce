use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;
use uuid::Uuid;

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("orgcal").expect("Failed to find orgcal binary");

        // Keep any orgcal.toml in the developer's tree out of the picture
        cmd.current_dir(self.temp_dir.path());
        cmd.env("ORGCAL_DATABASE_URL", &self.db_path);
        cmd.env_remove("ORGCAL_CONFIG");

        cmd
    }

    /// Directory the binary runs in, where an `orgcal.toml` would be picked up
    pub fn dir(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Creates a series and returns its group id and row ids in position order.
    pub fn create_series(&self, args: &[&str]) -> (Uuid, Vec<Uuid>) {
        let mut full_args = vec!["create"];
        full_args.extend_from_slice(args);
        let output = self.run_success(&full_args).get_output().stdout.clone();

        // The summary line names the group first, then the table lists each row
        let mut ids = uuids_in(&String::from_utf8_lossy(&output)).into_iter();
        let group_id = ids.next().expect("create output names the series");
        (group_id, ids.collect())
    }

    /// Row ids shown by `list --group`, in position order.
    pub fn list_group(&self, group_id: Uuid, include_deleted: bool) -> Vec<Uuid> {
        let group = group_id.to_string();
        let mut args = vec!["list", "--group", group.as_str()];
        if include_deleted {
            args.push("--include-deleted");
        }
        let output = self.run_success(&args).get_output().stdout.clone();
        uuids_in(&String::from_utf8_lossy(&output))
    }
}

/// Every UUID appearing in `text`, in order.
pub fn uuids_in(text: &str) -> Vec<Uuid> {
    text.split(|c: char| c.is_whitespace() || c == '│' || c == '|')
        .filter_map(|word| Uuid::parse_str(word).ok())
        .collect()
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const ORG: &'static str = "0191b5e2-7c3a-7d4e-8f00-0000000000aa";

    /// A weekly series far enough in the future that every row is upcoming
    pub fn weekly_series_args() -> Vec<&'static str> {
        vec![
            "Chapter meeting",
            "--org", Self::ORG,
            "--start", "2099-01-05T19:00:00Z",
            "--end", "2099-01-05T20:30:00Z",
            "--rule", "weekly:mon",
            "--until", "2099-02-01",
            "--location", "Chapter house",
        ]
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    pub fn has_event_table_headers() -> impl Predicate<str> {
        predicate::str::contains("Title")
            .and(predicate::str::contains("Starts"))
            .and(predicate::str::contains("Location"))
    }

    pub fn series_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("Created series")
    }

    pub fn empty_result() -> impl Predicate<str> {
        predicate::str::contains("No events found")
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
