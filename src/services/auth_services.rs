// src/services/auth_services.rs
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Config;
use crate::dtos::auth::SessionOut;
use crate::models::user::{AuthUser, JwtClaims};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("supabase error: {0}")]
    Supabase(String),
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Rejected(String),
}

/// Passthrough to Supabase GoTrue (`/auth/v1`).
#[derive(Clone)]
pub struct AuthService {
    client: Client,
    supabase_url: String,
    anon_key: String,
    service_role_key: String,
    jwt_secret: Option<String>,
}

impl AuthService {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            supabase_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
            service_role_key: config.supabase_service_role_key.clone(),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.supabase_url, path)
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        let resp = self
            .client
            .post(self.url("/signup"))
            .header("apikey", &self.anon_key)
            .json(&Body { email, password })
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            if status.is_client_error() {
                return Err(AuthError::Rejected(supabase_message(&text, "Signup failed")));
            }
            return Err(AuthError::Supabase(format!("signup failed: {} {}", status, text)));
        }

        let json_val: Value = serde_json::from_str(&text)
            .map_err(|e| AuthError::Supabase(format!("invalid json: {}", e)))?;

        // with email confirmation on, the user object is the top-level body
        let user = json_val.get("user").cloned().unwrap_or(json_val);
        serde_json::from_value(user)
            .map_err(|e| AuthError::Supabase(format!("signup returned no user: {}", e)))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(SessionOut, AuthUser), AuthError> {
        #[derive(Serialize)]
        struct LoginBody<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResp {
            access_token: String,
            refresh_token: Option<String>,
            expires_in: Option<i64>,
            token_type: Option<String>,
            user: AuthUser,
        }

        let resp = self
            .client
            .post(self.url("/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&LoginBody { email, password })
            .send()
            .await?;

        let status = resp.status();
        let txt = resp.text().await.unwrap_or_default();

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            debug!("login rejected: {}", txt);
            return Err(AuthError::InvalidCredentials);
        }
        if status != StatusCode::OK {
            return Err(AuthError::Supabase(format!("login failed: {} {}", status, txt)));
        }

        let tr: TokenResp = serde_json::from_str(&txt)
            .map_err(|e| AuthError::Supabase(format!("invalid json in login response: {}", e)))?;

        let session = SessionOut {
            access_token: tr.access_token,
            refresh_token: tr.refresh_token,
            expires_in: tr.expires_in,
            token_type: tr.token_type,
        };
        Ok((session, tr.user))
    }

    /// Sends the password-reset email. `redirect_to` is where the link lands.
    pub async fn recover(&self, email: &str, redirect_to: Option<&str>) -> Result<(), AuthError> {
        let mut req = self
            .client
            .post(self.url("/recover"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email }));
        if let Some(to) = redirect_to {
            req = req.query(&[("redirect_to", to)]);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            if status.is_client_error() {
                return Err(AuthError::Rejected(supabase_message(&text, "Password reset failed")));
            }
            return Err(AuthError::Supabase(format!("recover failed: {} {}", status, text)));
        }
        Ok(())
    }

    /// User behind `access_token`, as the auth service sees it now.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let resp = self
            .client
            .get(self.url("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidToken);
        }
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AuthError::Supabase(format!("get user failed: {} {}", status, text)));
        }
        serde_json::from_str(&text).map_err(|e| AuthError::Supabase(format!("invalid user json: {}", e)))
    }

    /// Validates an access token. Uses the JWT secret when configured, the auth service otherwise.
    pub async fn verify_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        match &self.jwt_secret {
            Some(secret) => decode_access_token(token, secret),
            None => self.get_user(token).await,
        }
    }

    /// Merges `data` into the caller's `user_metadata`.
    pub async fn update_user_metadata(
        &self,
        access_token: &str,
        data: Value,
    ) -> Result<AuthUser, AuthError> {
        let resp = self
            .client
            .put(self.url("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&json!({ "data": data }))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            return Err(AuthError::Supabase(format!("update user failed: {} {}", status, text)));
        }
        serde_json::from_str(&text).map_err(|e| AuthError::Supabase(format!("invalid user json: {}", e)))
    }

    /// Writes `role` into the user's `app_metadata` with the service role key.
    pub async fn set_role(&self, user: &AuthUser, role: &str) -> Result<(), AuthError> {
        let mut app_metadata = match &user.app_metadata {
            Value::Object(m) => m.clone(),
            _ => serde_json::Map::new(),
        };
        app_metadata.insert("role".to_string(), Value::String(role.to_string()));

        let url = self.url(&format!("/admin/users/{}", user.id));
        let resp = self
            .client
            .put(&url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&json!({ "app_metadata": app_metadata }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!("setting role for {} failed: {} {}", user.id, status, text);
            return Err(AuthError::Supabase(format!("admin update failed: {} {}", status, text)));
        }
        Ok(())
    }
}

/// Decodes a Supabase HS256 access token issued for `authenticated` users.
pub fn decode_access_token(token: &str, secret: &str) -> Result<AuthUser, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&["authenticated"]);

    let data = decode::<JwtClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| {
            debug!("token rejected: {}", e);
            AuthError::InvalidToken
        })?;
    AuthUser::from_claims(data.claims).map_err(|_| AuthError::InvalidToken)
}

fn supabase_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(|s| s.to_string()))
        })
        .unwrap_or_else(|| fallback.to_string())
}
