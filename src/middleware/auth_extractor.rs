// src/middleware/auth_extractor.rs
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use log::debug;

use crate::error::ApiError;
use crate::models::user::AuthUser;
use crate::services::admin_gate;
use crate::AppState;

/// User behind a valid `Authorization: Bearer` access token.
pub struct AuthenticatedUser {
    pub user: AuthUser,
    pub access_token: String,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> uuid::Uuid {
        self.user.id
    }
}

/// An authenticated user that passed the admin gate.
pub struct AdminUser {
    pub user: AuthUser,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token.to_string()) }
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, ApiError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| ApiError::Internal("application state missing".to_string()))
}

async fn authenticate(state: &AppState, token: Option<String>) -> Result<AuthenticatedUser, ApiError> {
    let token = token.ok_or(ApiError::Unauthenticated)?;
    match state.auth.verify_token(&token).await {
        Ok(user) => Ok(AuthenticatedUser { user, access_token: token }),
        Err(e) => {
            debug!("authentication failed: {}", e);
            Err(e.into())
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = app_state(req);
        Box::pin(async move {
            let state = state?;
            authenticate(&state, token).await
        })
    }
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = app_state(req);
        Box::pin(async move {
            let state = state?;
            let session = match authenticate(&state, token).await {
                Ok(authed) => Some(authed.user),
                Err(ApiError::Unauthenticated) => None,
                Err(e) => return Err(e),
            };
            let user = admin_gate::authorize(&state.auth, &state.config, session).await?;
            Ok(AdminUser { user })
        })
    }
}
