use actix_web::{get, web, HttpResponse};

use crate::dtos::api_response::ok;
use crate::error::ApiError;
use crate::AppState;

/// GET /api/categories
#[get("/categories")]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let categories = state.categories.list().await?;
    Ok(ok("Categories retrieved successfully", categories))
}

/// GET /api/categories/{slug}
#[get("/categories/{slug}")]
pub async fn category_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let slug = path.into_inner().trim().to_lowercase();
    let detail = state.providers.category_detail(&slug).await?;
    Ok(ok("Category retrieved successfully", detail))
}
