use std::env;

// Runtime/server settings read from the environment.

pub fn http_port() -> u16 {
    parse_or(env::var("PATIENT_SERVER_PORT").ok(), 8080)
}

pub fn database_url() -> Option<String> {
    env::var("DATABASE_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

pub fn database_max_connections() -> u32 {
    parse_or(
        env::var("DATABASE_MAX_CONNECTIONS").ok(),
        DEFAULT_MAX_CONNECTIONS,
    )
}

pub fn cors_allowed_origin() -> String {
    env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string())
}

// Shape of log lines written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

pub fn log_format() -> LogFormat {
    parse_log_format(env::var("LOG_FORMAT").ok().as_deref())
}

fn parse_log_format(value: Option<&str>) -> LogFormat {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Compact,
    }
}

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Settings needed to assemble the service; tests build these directly.
#[derive(Clone, Debug)]
pub struct Settings {
    // Absent means patients are kept in memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub allowed_origin: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            database_url: database_url(),
            database_max_connections: database_max_connections(),
            allowed_origin: cors_allowed_origin(),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
