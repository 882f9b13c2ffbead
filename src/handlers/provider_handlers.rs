// src/handlers/provider_handlers.rs
use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::dtos::api_response::{created, ok};
use crate::dtos::provider_dtos::{BrowseQuery, OptionsOut, RegistrationIn};
use crate::dtos::review_dtos::ReviewIn;
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::provider::{experience_options, price_range_options, ProviderDraft};
use crate::AppState;

/// GET /api/providers
#[get("/providers")]
pub async fn list_providers(
    state: web::Data<AppState>,
    query: web::Query<BrowseQuery>,
) -> Result<HttpResponse, ApiError> {
    let cards = state.providers.browse(query.into_inner()).await?;
    Ok(ok("Providers retrieved successfully", cards))
}

/// GET /api/providers/options
#[get("/providers/options")]
pub async fn provider_options() -> HttpResponse {
    ok(
        "Options retrieved successfully",
        OptionsOut {
            experience: experience_options(),
            price_ranges: price_range_options(),
        },
    )
}

/// GET /api/providers/me
#[get("/providers/me")]
pub async fn my_listing(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let listing = state.providers.my_listing(auth.user_id()).await?;
    Ok(ok("Listing retrieved successfully", listing))
}

/// POST /api/providers/steps/{step}
/// Reports which required fields of a wizard step are still blank.
#[post("/providers/steps/{step}")]
pub async fn validate_step(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
    path: web::Path<u8>,
    body: web::Json<ProviderDraft>,
) -> Result<HttpResponse, ApiError> {
    let step = path.into_inner();
    let check = state.providers.validate_step(step, &body).await?;
    let message = if check.complete {
        "Step complete"
    } else {
        "Please fill in the required fields"
    };
    Ok(ok(message, check))
}

/// POST /api/providers
/// Final wizard submission; the listing starts out pending review.
#[post("/providers")]
pub async fn register_provider(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<RegistrationIn>,
) -> Result<HttpResponse, ApiError> {
    let saved = state.providers.submit(auth.user_id(), body.into_inner()).await?;
    Ok(created("Registration submitted. An administrator will review it shortly.", saved))
}

/// GET /api/providers/{id}
#[get("/providers/{id}")]
pub async fn provider_detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let detail = state.providers.public_detail(path.into_inner()).await?;
    Ok(ok("Provider retrieved successfully", detail))
}

/// GET /api/providers/{id}/reviews
#[get("/providers/{id}/reviews")]
pub async fn list_reviews(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let reviews = state.providers.reviews_for(path.into_inner()).await?;
    Ok(ok("Reviews retrieved successfully", reviews))
}

/// POST /api/providers/{id}/reviews
#[post("/providers/{id}/reviews")]
pub async fn create_review(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<ReviewIn>,
) -> Result<HttpResponse, ApiError> {
    let ReviewIn { rating, comment } = body.into_inner();
    let review = state
        .providers
        .add_review(path.into_inner(), auth.user_id(), rating, comment)
        .await?;
    Ok(created("Review submitted", review))
}
