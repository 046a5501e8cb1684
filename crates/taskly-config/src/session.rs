//! Session lifetime, cookie attributes and logout policy.
//!
//! # Environment Variables
//!
//! - `SESSION_TTL_SECS`: lifetime of a session (default: 86400, 24 hours).
//!   Values outside 1 second to 10 years fall back to the default.
//! - `SESSION_COOKIE_SECURE`: set the `Secure` cookie attribute (default:
//!   true; turn off only for plain-HTTP local development)
//! - `SESSION_REVOKE_ON_LOGOUT`: delete the server-side session row on
//!   logout (default: true). When false, logout only clears the cookie and
//!   the token stays valid until it expires.

use chrono::TimeDelta;

use crate::{env_flag, env_or};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "session_token";

const DEFAULT_TTL_SECS: i64 = 24 * 60 * 60;
const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub ttl_secs: i64,
    pub cookie_secure: bool,
    pub revoke_on_logout: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            cookie_secure: true,
            revoke_on_logout: true,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            ttl_secs: sanitize_ttl(env_or("SESSION_TTL_SECS", DEFAULT_TTL_SECS)),
            cookie_secure: env_flag("SESSION_COOKIE_SECURE", true),
            revoke_on_logout: env_flag("SESSION_REVOKE_ON_LOGOUT", true),
        }
    }

    /// Session lifetime, bounded to 1 second..=10 years.
    pub fn ttl(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.ttl_secs.clamp(1, MAX_TTL_SECS))
            .unwrap_or(TimeDelta::seconds(DEFAULT_TTL_SECS))
    }
}

fn sanitize_ttl(secs: i64) -> i64 {
    if (1..=MAX_TTL_SECS).contains(&secs) {
        secs
    } else {
        DEFAULT_TTL_SECS
    }
}
