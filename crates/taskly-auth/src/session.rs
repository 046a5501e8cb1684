use chrono::{DateTime, TimeDelta, Utc};
use taskly_config::SessionConfig;
use taskly_models::{NewSession, Session, UserId};

use crate::token::generate_session_token;

/// Outcome of checking a stored session against the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Expired,
}

/// Fixed-lifetime session policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    ttl: TimeDelta,
}

impl SessionPolicy {
    pub fn new(ttl: TimeDelta) -> Self {
        Self { ttl }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.ttl())
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Builds the row for a fresh session: new random token, expiring one
    /// TTL after `now`. The expiry saturates at the latest representable
    /// instant.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> NewSession {
        NewSession {
            token: generate_session_token(),
            user_id,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            created_at: now,
        }
    }

    pub fn check(&self, session: &Session, now: DateTime<Utc>) -> SessionState {
        if session.is_expired_at(now) {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}
