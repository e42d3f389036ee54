use anyhow::Result;

pub mod calendar;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod ident;
pub mod manager;
pub mod models;
pub mod password;
pub mod roster;
pub mod schema;
pub mod session;

pub use crate::error::{AttendanceError, Result as AttendanceResult};
pub use crate::manager::AttendanceManager;
pub use crate::session::Session;

use crate::config::Settings;

/// Creates a manager from `<config_name>.toml` and the `ATTENDANCE__*` environment.
pub fn create_default_manager(config_name: &str) -> Result<AttendanceManager> {
    let settings = Settings::load(config_name)?;
    tracing::debug!(?settings, "loaded settings");

    Ok(AttendanceManager::new(settings))
}
