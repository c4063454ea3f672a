//! Process configuration, read from command-line flags with environment fallbacks.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

/// Which storage backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// MongoDB, configured by `MONGODB_URI` and `DATABASE_NAME`.
    Mongodb,
    /// A process-local store. Records are lost on exit.
    Memory,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{0}` is required when the backend is mongodb")]
    MissingSetting(&'static str),
}

#[derive(Debug, Clone, Parser)]
#[command(name = "rollcall", version, about = "HTTP service for student records")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "ROLLCALL_BIND", default_value = "0.0.0.0:8000")]
    pub bind: String,

    #[arg(long, env = "ROLLCALL_BACKEND", value_enum, default_value_t = BackendKind::Mongodb)]
    pub backend: BackendKind,

    /// MongoDB connection string.
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    /// MongoDB database holding the `students` collection.
    #[arg(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,

    /// Upper bound, in seconds, on every storage call made while serving a request.
    #[arg(
        long,
        env = "ROLLCALL_STORAGE_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub storage_timeout_secs: u64,

    /// Emit logs as JSON lines.
    #[arg(long, env = "ROLLCALL_LOG_JSON")]
    pub log_json: bool,
}

/// Connection settings for the MongoDB backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoDbSettings<'a> {
    pub uri: &'a str,
    pub database: &'a str,
}

impl Config {
    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs)
    }

    /// Returns the MongoDB settings, failing if either is unset or empty.
    pub fn mongodb_settings(&self) -> Result<MongoDbSettings<'_>, ConfigError> {
        let uri = non_empty(self.mongodb_uri.as_deref()).ok_or(ConfigError::MissingSetting("MONGODB_URI"))?;
        let database = non_empty(self.database_name.as_deref())
            .ok_or(ConfigError::MissingSetting("DATABASE_NAME"))?;

        Ok(MongoDbSettings { uri, database })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
