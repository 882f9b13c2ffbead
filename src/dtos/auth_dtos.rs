use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserPublic;

#[derive(Deserialize)]
pub struct SignupIn {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginIn {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct PasswordResetIn {
    pub email: String,
    pub redirect_to: Option<String>,
}

#[derive(Serialize)]
pub struct SessionOut {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub user_id: Uuid,
    pub message: String,
    pub next_step: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub session: SessionOut,
    pub user: UserPublic,
    pub next_step: String,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: UserPublic,
    pub has_provider_listing: bool,
}
