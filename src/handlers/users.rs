use crate::db::{UserProfile, UserSummary};
use crate::{AppError, router::AppState};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub username: Option<String>,
}

/// GET /users -> every user as `{id, username}`.
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    Ok(Json(state.store.list_all_basic().await?))
}

/// GET /profile?username=.. -> the record without its password, or 404.
pub async fn profile(
    State(state): State<AppState>,
    query: Result<Query<ProfileQuery>, QueryRejection>,
) -> Result<Json<UserProfile>, AppError> {
    let Query(query) = query?;
    state
        .store
        .find_by_username_excluding_password(query.username.as_deref())
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}
