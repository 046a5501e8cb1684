use axum::{Router, middleware, routing::post};

use crate::middleware::require_session;
use crate::state::AppState;

use super::controller::{login_user, logout_user, register_user};

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout_user))
        .route_layer(middleware::from_fn_with_state(state, require_session));

    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .merge(protected)
}
