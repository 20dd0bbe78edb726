// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;

use crate::quiz::DEFAULT_TIME_LIMIT_SECONDS;

/// Company codes accepted when `COMPANY_CODES` is not set.
pub const DEFAULT_COMPANY_CODES: &[&str] = &[
    "TECH001", "TECH002", "TECH003", "ALPHA001", "ALPHA002", "OMEGA001", "OMEGA002", "DEMO001",
];

/// Emails granted the admin role when `ADMIN_EMAILS` is not set.
pub const DEFAULT_ADMIN_EMAILS: &[&str] = &[
    "admin@company.com",
    "tanaka@company.com",
    "manager@company.com",
];

/// How long a finished session stays readable before it is dropped from memory.
pub const COMPLETED_SESSION_RETENTION_SECS: u64 = 300;

/// Questions drawn for a genre quiz when the request does not say.
pub const DEFAULT_GENRE_QUESTION_COUNT: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_address: SocketAddr,
    pub question_time_limit: u32,
    pub tick_interval_ms: u64,
    pub company_codes: Vec<String>,
    pub admin_emails: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://quiz.db?mode=rwc".to_string());

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        let jwt_expiration = parse_var("JWT_EXPIRATION", 86_400)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_address = parse_var("BIND_ADDRESS", SocketAddr::from(([0, 0, 0, 0], 3000)))?;

        let question_time_limit =
            parse_var("QUESTION_TIME_LIMIT_SECONDS", DEFAULT_TIME_LIMIT_SECONDS)?;
        if question_time_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "QUESTION_TIME_LIMIT_SECONDS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let tick_interval_ms = parse_var("TICK_INTERVAL_MS", 1000)?;
        if tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "TICK_INTERVAL_MS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let company_codes = list_var("COMPANY_CODES", DEFAULT_COMPANY_CODES)
            .into_iter()
            .map(|code| code.to_uppercase())
            .collect();

        let admin_emails = list_var("ADMIN_EMAILS", DEFAULT_ADMIN_EMAILS)
            .into_iter()
            .map(|email| email.to_lowercase())
            .collect();

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_address,
            question_time_limit,
            tick_interval_ms,
            company_codes,
            admin_emails,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Comma separated list; blank entries are skipped.
fn list_var(name: &str, default: &[&str]) -> Vec<String> {
    match env::var(name) {
        Ok(raw) => split_list(&raw),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
