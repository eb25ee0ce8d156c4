use crate::config::LoginMode;
use crate::db::UserStore;
use crate::handlers::{auth, users};
use axum::{
    Router,
    routing::{get, post},
};

/// Per-process state shared by all handlers. No request-scoped mutation.
#[derive(Clone)]
pub struct AppState {
    pub store: UserStore,
    pub login_mode: LoginMode,
}

impl AppState {
    pub fn new(store: UserStore, login_mode: LoginMode) -> Self {
        Self { store, login_mode }
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/users", get(users::list_users))
        .route("/profile", get(users::profile))
        .with_state(state)
}
