use config::{Config, ConfigError, Environment, File};
use derive_more::Display;
use dotenv::dotenv;
use serde::Deserialize;
use std::{env, fmt, str::FromStr};

pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, Display, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    #[display("development")]
    Development,
    #[display("production")]
    Production,
    #[display("testing")]
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Development, Self::Production, Self::Testing]
            .into_iter()
            .find(|env| env.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::Message(format!("Invalid APP_ENV value: {}", s)))
    }
}

/// Where blog and user records live.
#[derive(Debug, Display, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    #[display("postgres")]
    Postgres,
    #[display("memory")]
    Memory,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "defaults::env")]
    pub env: AppEnvironment,
    #[serde(default = "defaults::name")]
    pub name: String,
    #[serde(default = "defaults::host")]
    pub host: String,
    #[serde(default = "defaults::port")]
    pub port: u16,
    #[serde(default = "num_cpus::get")]
    pub worker_count: usize,

    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default)]
    pub database_url: String,

    #[serde(default = "defaults::cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "defaults::jwt_expiration_minutes")]
    pub jwt_expiration_minutes: i64,

    #[serde(default)]
    pub log_format: LogFormat,
}

mod defaults {
    use super::AppEnvironment;

    pub fn env() -> AppEnvironment {
        AppEnvironment::Development
    }

    pub fn name() -> String {
        "Bloglist-API".into()
    }

    pub fn host() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        3003
    }

    pub fn cors_origins() -> Vec<String> {
        vec!["*".into()]
    }

    pub fn jwt_expiration_minutes() -> i64 {
        60
    }
}

impl AppConfig {
    /// Layers `config/default`, `config/{APP_ENV}` and `APP_*` variables, then validates.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let env_name = env::var("APP_ENV")
            .map(|raw| raw.parse::<AppEnvironment>())
            .unwrap_or(Ok(AppEnvironment::Development))?;

        let mut config: Self = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            )
            .build()?
            .try_deserialize()?;

        config.env = env_name;

        // Deployments commonly provide these without the APP_ prefix
        if config.storage == StorageBackend::Postgres {
            config.database_url = first_set(config.database_url, &["APP_DATABASE_URL", "DATABASE_URL"])?;
        }
        config.jwt_secret = first_set(config.jwt_secret, &["APP_JWT_SECRET", "SECRET"])?;

        config.validate()?;
        Ok(config)
    }

    /// Reports every problem at once rather than the first one found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (
                self.storage == StorageBackend::Postgres && self.database_url.trim().is_empty(),
                "DATABASE_URL cannot be empty",
            ),
            (
                self.jwt_secret.len() < MIN_SECRET_LENGTH,
                "JWT_SECRET must be at least 32 characters",
            ),
            (
                self.jwt_expiration_minutes <= 0,
                "JWT_EXPIRATION_MINUTES must be positive",
            ),
            (
                self.is_production() && self.cors_origins().iter().any(|o| o == "*"),
                "Wildcard CORS (*) is not allowed in production",
            ),
        ];

        let problems: Vec<&str> = checks
            .iter()
            .filter(|(failed, _)| *failed)
            .map(|(_, message)| *message)
            .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(problems.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origins with comma-separated entries split out and blanks dropped.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

fn first_set(current: String, keys: &[&str]) -> Result<String, ConfigError> {
    if !current.trim().is_empty() {
        return Ok(current);
    }

    keys.iter()
        .filter_map(|key| env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::Message(format!("{} must be set", keys.join(" or "))))
}

fn redacted(secret: &str) -> &'static str {
    match secret.len() {
        0 => "[MISSING]",
        n if n < MIN_SECRET_LENGTH => "[TOO_SHORT]",
        _ => "[REDACTED]",
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("worker_count", &self.worker_count)
            .field("storage", &self.storage)
            .field("database_url", &redacted(&self.database_url))
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &redacted(&self.jwt_secret))
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("log_format", &self.log_format)
            .finish()
    }
}
