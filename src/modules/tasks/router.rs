use axum::{Router, middleware, routing::get};

use crate::middleware::{authorize_task_owner, require_session};
use crate::state::AppState;

use super::controller::{create_task, delete_task, get_task, get_tasks, update_task};

/// Every task route needs a session; `/{id}` routes also need ownership.
/// Layers added later run first, so `require_session` wraps
/// `authorize_task_owner`.
pub fn init_tasks_router(state: AppState) -> Router<AppState> {
    let owned = Router::new()
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authorize_task_owner,
        ));

    Router::new()
        .route("/", get(get_tasks).post(create_task))
        .merge(owned)
        .route_layer(middleware::from_fn_with_state(state, require_session))
}
