use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::user::{UpdateProfileRequest, UserProfile};
use crate::services::profile;
use crate::AppState;

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let profile =
        profile::get_profile(state.store.as_ref(), auth_user.id, Utc::now().date_naive()).await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    let profile = profile::update_profile(
        state.store.as_ref(),
        auth_user.id,
        body,
        Utc::now().date_naive(),
    )
    .await?;
    Ok(Json(profile))
}
