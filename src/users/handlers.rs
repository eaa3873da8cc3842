use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    json::JsonBody,
    state::AppState,
    users::{
        dto::{EditUserRequest, UserResponse},
        repo::User,
    },
    util::is_valid_email,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me))
        .route("/users", patch(edit_me))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            warn!(%user_id, "token subject no longer exists");
            ApiError::Unauthorized("user no longer exists".into())
        })?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn edit_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(mut payload): JsonBody<EditUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if let Some(email) = payload.email.as_mut() {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) {
            warn!(%user_id, "invalid email in profile patch");
            return Err(ApiError::Validation("invalid email".into()));
        }
    }
    if matches!(&payload.first_name, Some(v) if v.trim().is_empty()) {
        return Err(ApiError::Validation("first_name must not be empty".into()));
    }
    if matches!(&payload.last_name, Some(v) if v.trim().is_empty()) {
        return Err(ApiError::Validation("last_name must not be empty".into()));
    }

    let user = User::update_profile(
        &state.db,
        user_id,
        payload.email.as_deref(),
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        warn!(%user_id, "token subject no longer exists");
        ApiError::Unauthorized("user no longer exists".into())
    })?;

    info!(%user_id, "profile updated");
    Ok(Json(user.into()))
}
