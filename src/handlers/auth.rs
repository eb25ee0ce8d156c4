use crate::db::UserProfile;
use crate::{AppError, router::AppState};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Both fields optional: an absent field is a lookup that cannot match.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: UserProfile,
}

/// POST /login -> 200 with the user (minus password) or 401.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let creds = match payload {
        Ok(Json(body)) => body,
        // Non-JSON requests carry no credentials rather than failing validation.
        Err(JsonRejection::MissingJsonContentType(_)) => {
            debug!("login body is not JSON; treating as empty");
            LoginRequest::default()
        }
        Err(rejection) => return Err(rejection.into()),
    };

    let user = state
        .store
        .authenticate(
            state.login_mode,
            creds.username.as_deref(),
            creds.password.as_deref(),
        )
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    info!(id = user.id, username = %user.username, "login succeeded");
    Ok(Json(LoginResponse {
        message: "Login successful",
        user: user.into(),
    })
    .into_response())
}
