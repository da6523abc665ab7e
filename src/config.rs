/*
 * Responsibility
 * - read settings from environment variables (.env is loaded first)
 * - validate values; anything malformed fails startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_ISSUER: &str = "knowsearch.ml";
pub const DEFAULT_AUDIENCE: &str = "frontend.knowsearch.ml";
pub const DEFAULT_SECRET_ENV: &str = "JWT_SECRET";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub issuer: String,
    pub audience: String,
    // Token lifetime (seconds). u32 keeps `iat + ttl` inside the i64 claim range.
    pub access_token_ttl_seconds: u32,
    // Name of the env var holding the HS256 secret. Read per issuance, not here.
    pub secret_env_var: String,
    pub log_raw_token: bool,
    pub log_identifier: bool,
    pub users_file: Option<PathBuf>,
    pub database_url: Option<String>,
    pub metrics_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "SIGNIN_PORT", 4000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("SIGNIN_PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let issuer = non_empty(&lookup, "AUTH_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.into());
        let audience =
            non_empty(&lookup, "AUTH_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.into());

        let access_token_ttl_seconds: u32 = parse_or(&lookup, "ACCESS_TOKEN_TTL_SECONDS", 60)?; // 1 min
        if access_token_ttl_seconds == 0 {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }

        let secret_env_var =
            non_empty(&lookup, "JWT_SECRET_ENV").unwrap_or_else(|| DEFAULT_SECRET_ENV.into());

        let log_raw_token = parse_flag(&lookup, "SIGNIN_LOG_RAW_TOKEN", false)?;
        let log_identifier = parse_flag(&lookup, "SIGNIN_LOG_IDENTIFIER", true)?;
        let metrics_enabled = parse_flag(&lookup, "METRICS_ENABLED", true)?;

        let users_file = non_empty(&lookup, "USERS_FILE").map(PathBuf::from);
        let database_url = non_empty(&lookup, "DATABASE_URL");

        Ok(Config {
            addr,
            app_env,
            issuer,
            audience,
            access_token_ttl_seconds,
            secret_env_var,
            log_raw_token,
            log_identifier,
            users_file,
            database_url,
            metrics_enabled,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key).map(|v| v.to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid(key)),
        },
    }
}
