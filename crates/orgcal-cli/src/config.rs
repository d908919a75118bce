use figment::{providers::{Env, Format, Serialized, Toml}, Figment};
use orgcal_core::recurrence::ExpansionLimits;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "orgcal.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Path of the SQLite database file
    pub database_url: String,
    /// Caps and default horizon applied when expanding new series
    #[serde(default)]
    pub recurrence: ExpansionLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "orgcal.db".to_string(),
            recurrence: ExpansionLimits::default(),
        }
    }
}

impl Config {
    /// Loads defaults, then `orgcal.toml` (or `$ORGCAL_CONFIG`), then
    /// `ORGCAL_*` variables. Nested keys use `__`, e.g.
    /// `ORGCAL_RECURRENCE__DAILY_CAP=90`.
    pub fn new() -> Result<Self, figment::Error> {
        let path = std::env::var("ORGCAL_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
        Self::figment(&path).extract()
    }

    fn figment(path: &str) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("ORGCAL_").ignore(&["log", "config"]).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let config: Config = Config::figment(CONFIG_FILE).extract()?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                database_url = "/var/lib/orgcal/events.db"

                [recurrence]
                weekly_cap = 10
                "#,
            )?;
            jail.set_env("ORGCAL_RECURRENCE__DAILY_CAP", "30");

            let config: Config = Config::figment(CONFIG_FILE).extract()?;
            assert_eq!(config.database_url, "/var/lib/orgcal/events.db");
            assert_eq!(config.recurrence.weekly_cap, 10);
            assert_eq!(config.recurrence.daily_cap, 30);
            assert_eq!(config.recurrence.monthly_cap, 12);
            Ok(())
        });
    }
}
