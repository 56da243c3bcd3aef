//! Configuration module for the HR directory backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key required on every `/api` request (disabled when unset)
    pub api_psk: Option<String>,
    /// Secret used to sign login tokens
    pub jwt_secret: Option<String>,
    /// Lifetime of a login token in minutes
    pub jwt_ttl_minutes: i64,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Insert demo records when the store is empty
    pub seed_demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("HR_API_PSK").ok().filter(|s| !s.is_empty());

        let jwt_secret = env::var("HR_JWT_SECRET").ok().filter(|s| !s.is_empty());

        let jwt_ttl_minutes = env::var("HR_JWT_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(1440);

        let db_path = env::var("HR_DB_PATH")
            .unwrap_or_else(|_| "./data/hr.sqlite".to_string())
            .into();

        let bind_addr = env::var("HR_BIND_ADDR")
            .ok()
            .and_then(|s| match s.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    eprintln!("Invalid HR_BIND_ADDR '{}', using default", s);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 5000)));

        let log_level = env::var("HR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("HR_LOG_FORMAT")
            .map(|s| s.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let seed_demo_data = env::var("HR_SEED_DEMO_DATA")
            .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            api_psk,
            jwt_secret,
            jwt_ttl_minutes,
            db_path,
            bind_addr,
            log_level,
            log_json,
            seed_demo_data,
        }
    }
}
