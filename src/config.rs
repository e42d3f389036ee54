//! Runtime settings.
//!
//! Settings are layered with [`config`]: an optional TOML file first, then `ATTENDANCE__*`
//! environment variables (a `.env` file is loaded beforehand with [`dotenvy`]). Credentials are
//! expected to come from the environment, e.g.
//!
//! ```text
//! ATTENDANCE__DATABASE__ENGINE=mysql
//! ATTENDANCE__DATABASE__PASSWORD=...
//! ATTENDANCE__ADMIN_PASSWORD=...
//! ```

use crate::calendar::RestDays;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;

/// Which store to use, and how to reach it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "engine", rename_all = "lowercase")]
pub enum DatabaseSettings {
    /// An embedded database file. `:memory:` works too.
    Sqlite { path: String },
    /// A client-server database. Only usable when built with the `mysql` feature.
    Mysql {
        host: String,
        #[serde(default, deserialize_with = "port_number")]
        port: Option<u16>,
        user: String,
        #[serde(default)]
        password: String,
        name: String,
    },
}

/// Environment values arrive as text and are never coerced, so a port may be `"3306"` or `3306`.
fn port_number<'de, D>(deserializer: D) -> std::result::Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Option::<Port>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Port::Number(port)) => Ok(Some(port)),
        Some(Port::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid port {text:?}"))),
    }
}

impl DatabaseSettings {
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self::Sqlite { path: path.into() }
    }

    /// A short description for logs, without credentials.
    pub fn describe(&self) -> String {
        match self {
            Self::Sqlite { path } => format!("sqlite:{path}"),
            Self::Mysql {
                host, port, name, ..
            } => match port {
                Some(port) => format!("mysql://{host}:{port}/{name}"),
                None => format!("mysql://{host}/{name}"),
            },
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self::sqlite("attendance.db")
    }
}

/// Everything the attendance manager needs to run.
#[derive(Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Master password that opens every class. No override exists when unset.
    #[serde(default)]
    pub admin_password: Option<String>,

    #[serde(default)]
    pub rest_days: RestDays,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database", &self.database)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<set>"))
            .field("rest_days", &self.rest_days)
            .finish()
    }
}

impl Settings {
    /// Loads settings from `<config_name>.toml` (if present) and the environment.
    pub fn load(config_name: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .add_source(File::with_name(config_name).required(false))
            .add_source(
                Environment::with_prefix("ATTENDANCE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("rest_days"),
            )
            .build()
            .with_context(|| format!("failed to read configuration {config_name:?}"))?;

        settings
            .try_deserialize()
            .context("invalid attendance configuration")
    }

    /// Parses settings from a TOML document.
    pub fn from_toml(source: &str) -> Result<Self> {
        Config::builder()
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .context("invalid attendance configuration")
    }
}
