//! Server-side session records.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::ids::{SessionId, UserId};

/// A persisted login session. The token is the lookup key; it is handed to
/// the client in the `session_token` cookie and never serialized in a body.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Session {
    pub id: SessionId,
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A session is only usable strictly before its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Values needed to insert a session row.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
