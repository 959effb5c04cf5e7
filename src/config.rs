use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::accounting::balance::DEFAULT_ANNUAL_QUOTA;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// No URL means the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,

    /// Leave days allowed per user per calendar year.
    pub annual_quota: i64,

    // Rate limiting
    pub rate_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:5000".to_string(),
            database_url: None,
            db_max_connections: 10,
            annual_quota: DEFAULT_ANNUAL_QUOTA,
            rate_per_min: 1000,
            api_prefix: String::new(),
            log_dir: "logs".to_string(),
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value:?}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or(defaults.server_addr),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                lookup("DB_MAX_CONNECTIONS"),
                defaults.db_max_connections,
            )?,
            annual_quota: parse_or(
                "LEAVE_ANNUAL_QUOTA",
                lookup("LEAVE_ANNUAL_QUOTA"),
                defaults.annual_quota,
            )?,
            rate_per_min: parse_or("RATE_PER_MIN", lookup("RATE_PER_MIN"), defaults.rate_per_min)?,
            api_prefix: lookup("API_PREFIX")
                .map(|p| p.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_prefix),
            log_dir: lookup("LOG_DIR").unwrap_or(defaults.log_dir),
        })
    }
}
