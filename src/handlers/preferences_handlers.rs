use actix_web::{get, put, web, HttpResponse};
use log::info;

use crate::dtos::api_response::ok;
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::preferences::{Preferences, PreferencesPatch};
use crate::AppState;

/// Preferences as stored on the auth user. Token claims are not used: they keep
/// the metadata from when the token was issued.
pub(crate) async fn stored_preferences(
    state: &AppState,
    auth: &AuthenticatedUser,
) -> Result<Preferences, ApiError> {
    let current = state.auth.get_user(&auth.access_token).await?;
    Ok(Preferences::from_user_metadata(&current.user_metadata))
}

/// GET /api/preferences
#[get("/preferences")]
pub async fn get_preferences(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let prefs = stored_preferences(&state, &auth).await?;
    Ok(ok("Preferences retrieved successfully", prefs.masked()))
}

/// PUT /api/preferences
/// Partial update, merged into what is stored.
#[put("/preferences")]
pub async fn update_preferences(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<PreferencesPatch>,
) -> Result<HttpResponse, ApiError> {
    let mut prefs = stored_preferences(&state, &auth).await?;
    prefs.apply(body.into_inner()).map_err(ApiError::BadRequest)?;

    let data = serde_json::json!({ "preferences": prefs });
    let updated = state.auth.update_user_metadata(&auth.access_token, data).await?;
    info!("preferences updated for {}", updated.id);

    let saved = Preferences::from_user_metadata(&updated.user_metadata);
    Ok(ok("Preferences saved", saved.masked()))
}
