//! # Taskly Auth
//!
//! Session token generation and lifetime policy.
//!
//! - [`token`]: Cryptographically random, opaque session tokens
//! - [`session`]: Turns a successful login into a [`NewSession`] and decides
//!   whether a stored session is still usable
//!
//! # Example
//!
//! ```ignore
//! use taskly_auth::SessionPolicy;
//! use taskly_config::SessionConfig;
//!
//! let policy = SessionPolicy::from_config(&SessionConfig::default());
//! let new_session = policy.issue(user.id, chrono::Utc::now());
//! ```
//!
//! [`NewSession`]: taskly_models::NewSession

pub mod session;
pub mod token;

pub use session::{SessionPolicy, SessionState};
pub use token::{TOKEN_BYTES, generate_session_token};
