use std::sync::Arc;

use taskly_auth::SessionPolicy;
use taskly_config::{CorsConfig, DatabaseConfig, SessionConfig};
use taskly_db::{PgStore, SessionStore, TaskStore, UserStore, init_db_pool, run_migrations};

/// Shared handles passed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub session_config: SessionConfig,
    pub session_policy: SessionPolicy,
    pub cors_config: CorsConfig,
}

impl AppState {
    /// Builds the state around a single backend implementing all three
    /// store traits.
    pub fn with_store<S>(
        store: Arc<S>,
        session_config: SessionConfig,
        cors_config: CorsConfig,
    ) -> Self
    where
        S: UserStore + SessionStore + TaskStore + 'static,
    {
        Self {
            users: store.clone(),
            sessions: store.clone(),
            tasks: store,
            session_policy: SessionPolicy::from_config(&session_config),
            session_config,
            cors_config,
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&database_config).await?;
    run_migrations(&pool).await?;

    Ok(AppState::with_store(
        Arc::new(PgStore::new(pool)),
        SessionConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
