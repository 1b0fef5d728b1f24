use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use chrono::FixedOffset;

use config::{Config, Environment, File};

use secrecy::{ExposeSecret, Secret};

use serde::Deserialize;
use serde_aux::prelude::*;

use sqlx::sqlite::SqliteConnectOptions;

use url::Url;

use crate::notify::RecipientSet;

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper, captured once at startup
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub database: DatabaseSettings,
    pub telegram: TelegramSettings,
    pub notifications: NotificationSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env file is fine, real environment variables still apply
        dotenvy::dotenv().ok();

        let path = env::current_dir()?.join("settings");
        // Get the current environment based on the `APP_ENV` environment variable, default to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }

    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            .add_source(File::from(base_path.join("base")).required(true))
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // NOTE: Should be used for any prod secrets. Takes the form `APP_<settings category>__<setting name>`.
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,

    secret_key: Secret<String>,

    site_name: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    utc_offset_hours: i32,
    templates_dir: Option<PathBuf>,
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
    /// Shared secret the messaging provider presents on webhook calls
    pub fn secret_key(&self) -> &Secret<String> {
        &self.secret_key
    }
    /// Business name shown in notifications
    pub fn site_name(&self) -> &str {
        &self.site_name
    }
    /// The reference timezone for booking timestamps
    pub fn clock(&self) -> anyhow::Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .with_context(|| format!("Invalid UTC offset: {} hours", self.utc_offset_hours))
    }
    /// Directory holding the landing page template
    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates_dir.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    path: PathBuf,
    #[serde(default = "default_true")]
    create_if_missing: bool,
}

impl DatabaseSettings {
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// The SQLite connection options
    pub fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(self.create_if_missing)
    }
}

#[derive(Debug, Deserialize)]
pub struct TelegramSettings {
    api_base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
    #[serde(default)]
    bot_token: Option<Secret<String>>,
    #[serde(default)]
    admin_id: String,
    #[serde(default)]
    staff_ids: String,
}

impl TelegramSettings {
    /// The base URL for the Bot API
    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_base_url).context("Failed to parse Telegram API base URL")
    }
    /// Timeout applied to every delivery attempt
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
    /// The bot token, `None` when notifications are disabled
    pub fn bot_token(&self) -> Option<&Secret<String>> {
        self.bot_token
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
    }
    pub fn recipients(&self) -> RecipientSet {
        RecipientSet::parse(&self.admin_id, &self.staff_ids)
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    queue_capacity: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    drain_timeout_seconds: u64,
}

impl NotificationSettings {
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }
    /// How long shutdown waits for queued notifications
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_seconds)
    }
}

fn default_true() -> bool {
    true
}
