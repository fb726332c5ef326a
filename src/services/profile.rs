use chrono::NaiveDate;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::goals::load_user;
use crate::error::{AppError, AppResult};
use crate::models::user::{UpdateProfileRequest, UserProfile};
use crate::store::NutritionStore;

#[instrument(skip(store))]
pub async fn get_profile(
    store: &dyn NutritionStore,
    user_id: Uuid,
    today: NaiveDate,
) -> AppResult<UserProfile> {
    let user = load_user(store, user_id).await?;
    Ok(UserProfile::from_user(user, today))
}

#[instrument(skip(store, req))]
pub async fn update_profile(
    store: &dyn NutritionStore,
    user_id: Uuid,
    req: UpdateProfileRequest,
    today: NaiveDate,
) -> AppResult<UserProfile> {
    if req.is_empty() {
        return Err(AppError::Validation("No profile fields to update".into()));
    }
    req.validate()?;
    if req.birthday.is_some_and(|b| b > today) {
        return Err(AppError::Validation("Birthday cannot be in the future".into()));
    }

    let user = store
        .update_profile(user_id, &req)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    info!("Profile updated");
    Ok(UserProfile::from_user(user, today))
}
