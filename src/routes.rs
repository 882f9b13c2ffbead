use actix_web::{web, HttpResponse};

use crate::dtos::api_response::ApiResponse;
use crate::handlers::{
    admin_handlers, auth_handlers, category_handlers, geocode_handlers, preferences_handlers,
    provider_handlers, realtime_handlers,
};

/// Registers every route. Static provider paths come before `/providers/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth_handlers::signup)          // POST /auth/signup
            .service(auth_handlers::login)           // POST /auth/login
            .service(auth_handlers::password_reset)  // POST /auth/password-reset
            .service(auth_handlers::me),             // GET  /auth/me
    )
    .service(
        web::scope("/api/admin")
            .service(admin_handlers::check)
            .service(admin_handlers::stats)
            .service(admin_handlers::list_providers)
            .service(admin_handlers::provider_detail)
            .service(admin_handlers::provider_action)
            .service(admin_handlers::add_category)
            .service(admin_handlers::rename_category)
            .service(admin_handlers::delete_category)
            .service(admin_handlers::list_settings)
            .service(admin_handlers::put_setting),
    )
    .service(
        web::scope("/api")
            .service(category_handlers::list_categories)
            .service(category_handlers::category_detail)
            .service(provider_handlers::list_providers)
            .service(provider_handlers::provider_options)
            .service(provider_handlers::my_listing)
            .service(provider_handlers::validate_step)
            .service(provider_handlers::register_provider)
            .service(provider_handlers::provider_detail)
            .service(provider_handlers::list_reviews)
            .service(provider_handlers::create_review)
            .service(preferences_handlers::get_preferences)
            .service(preferences_handlers::update_preferences)
            .service(geocode_handlers::forward)
            .service(geocode_handlers::reverse)
            .service(realtime_handlers::changes),
    )
    .default_service(web::to(not_found));
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()> {
        status: "error".to_string(),
        message: "Not found".to_string(),
        data: None,
    })
}
