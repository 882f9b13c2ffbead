// src/handlers/admin_handlers.rs
// Every handler here takes `AdminUser`, so the gate runs before any data is read.
use actix_web::{delete, get, post, put, web, HttpResponse};
use log::info;
use uuid::Uuid;

use crate::dtos::api_response::{created, ok};
use crate::dtos::category_dtos::CategoryIn;
use crate::dtos::provider_dtos::{AdminListQuery, AdminProviderOut};
use crate::dtos::settings_dtos::SettingIn;
use crate::error::ApiError;
use crate::handlers::auth_handlers::public_user;
use crate::middleware::auth_extractor::AdminUser;
use crate::models::provider::AdminAction;
use crate::models::setting::validate_key;
use crate::AppState;

/// GET /api/admin/check
#[get("/check")]
pub async fn check(state: web::Data<AppState>, admin: AdminUser) -> HttpResponse {
    ok("Admin access granted", public_user(&admin.user, &state.config))
}

/// GET /api/admin/stats
#[get("/stats")]
pub async fn stats(state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, ApiError> {
    let stats = state.providers.stats().await?;
    Ok(ok("Dashboard stats", stats))
}

/// GET /api/admin/providers
#[get("/providers")]
pub async fn list_providers(
    state: web::Data<AppState>,
    _admin: AdminUser,
    query: web::Query<AdminListQuery>,
) -> Result<HttpResponse, ApiError> {
    let tabs = state.providers.admin_tabs(query.status).await?;
    Ok(ok("Providers retrieved successfully", tabs))
}

/// GET /api/admin/providers/{id}
#[get("/providers/{id}")]
pub async fn provider_detail(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let detail = state.providers.admin_detail(path.into_inner()).await?;
    Ok(ok("Provider retrieved successfully", detail))
}

/// POST /api/admin/providers/{id}/{action}
/// `action` is one of approve (alias reactivate), reject, suspend.
#[post("/providers/{id}/{action}")]
pub async fn provider_action(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, action) = path.into_inner();
    let action: AdminAction = action.parse().map_err(ApiError::BadRequest)?;

    let updated = state.providers.apply_action(id, action).await?;
    info!("admin {} applied {} to provider {}", admin.user.id, action.as_str(), id);

    let message = format!("Provider {}", updated.status);
    Ok(ok(&message, AdminProviderOut::from(updated)))
}

/// POST /api/admin/categories
#[post("/categories")]
pub async fn add_category(
    state: web::Data<AppState>,
    _admin: AdminUser,
    body: web::Json<CategoryIn>,
) -> Result<HttpResponse, ApiError> {
    let category = state.categories.add(&body.name).await?;
    Ok(created("Category added", category))
}

/// PUT /api/admin/categories/{id}
#[put("/categories/{id}")]
pub async fn rename_category(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    body: web::Json<CategoryIn>,
) -> Result<HttpResponse, ApiError> {
    let category = state.categories.rename(path.into_inner(), &body.name).await?;
    Ok(ok("Category updated", category))
}

/// DELETE /api/admin/categories/{id}
#[delete("/categories/{id}")]
pub async fn delete_category(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state.categories.delete(id).await?;
    Ok(ok("Category deleted", serde_json::json!({ "id": id })))
}

/// GET /api/admin/settings
#[get("/settings")]
pub async fn list_settings(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, ApiError> {
    let settings = state.settings.list().await?;
    Ok(ok("Settings retrieved successfully", settings))
}

/// PUT /api/admin/settings/{key}
#[put("/settings/{key}")]
pub async fn put_setting(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<SettingIn>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    validate_key(&key).map_err(ApiError::BadRequest)?;

    let saved = state.settings.put(&key, body.into_inner().value).await?;
    info!("admin {} updated setting {}", admin.user.id, key);
    Ok(ok("Setting saved", saved))
}
