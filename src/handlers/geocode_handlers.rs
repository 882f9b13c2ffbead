use actix_web::{get, web, HttpResponse};

use crate::dtos::api_response::ok;
use crate::dtos::geocode_dtos::{ForwardQuery, ReverseQuery};
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::handlers::preferences_handlers::stored_preferences;
use crate::AppState;

/// The caller's saved geocoding key, if any.
async fn user_key(state: &AppState, auth: &AuthenticatedUser) -> Result<Option<String>, ApiError> {
    Ok(stored_preferences(state, auth).await?.geocoding_api_key)
}

/// GET /api/geocode/forward?q=
#[get("/geocode/forward")]
pub async fn forward(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    query: web::Query<ForwardQuery>,
) -> Result<HttpResponse, ApiError> {
    let key = user_key(&state, &auth).await?;
    let places = state.geocoding.forward(&query.q, key.as_deref()).await?;
    Ok(ok("Places found", places))
}

/// GET /api/geocode/reverse?lat=&lng=
#[get("/geocode/reverse")]
pub async fn reverse(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    query: web::Query<ReverseQuery>,
) -> Result<HttpResponse, ApiError> {
    let key = user_key(&state, &auth).await?;
    let place = state.geocoding.reverse(query.lat, query.lng, key.as_deref()).await?;
    match place {
        Some(p) => Ok(ok("Place found", p)),
        None => Err(ApiError::NotFound("No place found at this location".to_string())),
    }
}
