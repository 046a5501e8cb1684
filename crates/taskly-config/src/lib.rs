//! # Taskly Config
//!
//! Configuration types for the Taskly API, loaded from environment variables
//! (usually through a `.env` file read by `dotenvy` at startup).
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL connection settings
//! - [`server`]: Bind address of the HTTP server
//! - [`session`]: Session lifetime, cookie and logout policy
//!
//! # Example
//!
//! ```ignore
//! use taskly_config::{CorsConfig, DatabaseConfig, SessionConfig};
//!
//! let database = DatabaseConfig::from_env()?;
//! let session = SessionConfig::from_env();
//! let cors = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod server;
pub mod session;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;
pub use session::{SESSION_COOKIE_NAME, SessionConfig};

/// Reads and parses an environment variable, falling back to `default` when
/// it is unset or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Boolean flags accept `true`/`1` and `false`/`0` (case-insensitive).
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => match v.trim().to_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
