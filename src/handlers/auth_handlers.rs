use std::sync::LazyLock;

use actix_web::{get, post, web, HttpResponse};
use log::{info, warn};
use regex::Regex;

use crate::dtos::api_response::{created, ok};
use crate::dtos::auth::{LoginIn, LoginResponse, MeResponse, PasswordResetIn, SignupIn, SignupResponse};
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::user::{AuthUser, UserPublic, ADMIN_ROLE};
use crate::config::Config;
use crate::AppState;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid email regex")
});

fn looks_like_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub(crate) fn public_user(user: &AuthUser, config: &Config) -> UserPublic {
    let is_admin = user.has_admin_role()
        || user.email.as_deref().is_some_and(|e| config.is_bootstrap_admin(e));
    UserPublic {
        id: user.id,
        email: user.email.clone(),
        role: if is_admin { ADMIN_ROLE.to_string() } else { "user".to_string() },
        is_admin,
    }
}

/// POST /auth/signup
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupIn>,
) -> Result<HttpResponse, ApiError> {
    let email = body.email.trim().to_lowercase();

    if !looks_like_email(&email) {
        return Err(ApiError::BadRequest("Invalid email format".to_string()));
    }
    if body.password.len() < 6 {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters long".to_string(),
        ));
    }

    let user = state.auth.signup(&email, &body.password).await.map_err(|e| {
        warn!("signup failed: {}", e);
        ApiError::from(e)
    })?;
    info!("account created: {}", user.id);

    Ok(created(
        "Account created",
        SignupResponse {
            user_id: user.id,
            message: "Account created successfully. Please sign in to continue.".to_string(),
            next_step: "login".to_string(),
        },
    ))
}

/// POST /auth/login
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginIn>,
) -> Result<HttpResponse, ApiError> {
    let email = body.email.trim().to_lowercase();
    let (session, user) = state.auth.login(&email, &body.password).await.map_err(|e| {
        warn!("login failed: {}", e);
        ApiError::from(e)
    })?;

    let user = public_user(&user, &state.config);
    let next_step = if user.is_admin { "admin" } else { "home" };
    Ok(ok(
        "Login successful",
        LoginResponse { session, user, next_step: next_step.to_string() },
    ))
}

/// POST /auth/password-reset
#[post("/password-reset")]
pub async fn password_reset(
    state: web::Data<AppState>,
    body: web::Json<PasswordResetIn>,
) -> Result<HttpResponse, ApiError> {
    let email = body.email.trim().to_lowercase();
    if !looks_like_email(&email) {
        return Err(ApiError::BadRequest("Invalid email format".to_string()));
    }

    state.auth.recover(&email, body.redirect_to.as_deref()).await?;
    Ok(ok(
        "If an account exists for this email, a reset link has been sent",
        serde_json::json!({ "email": email }),
    ))
}

/// GET /auth/me
#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let has_provider_listing = state.providers.providers.exists_for_user(auth.user_id()).await?;
    Ok(ok(
        "Current user",
        MeResponse {
            user: public_user(&auth.user, &state.config),
            has_provider_listing,
        },
    ))
}
