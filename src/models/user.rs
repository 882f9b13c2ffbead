use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";

/// JWT claims carried by a Supabase access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// subject / user id
    pub sub: String,
    pub aud: Option<String>,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub role: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub app_metadata: Value,
    #[serde(default)]
    pub user_metadata: Value,
}

/// User record as returned by the auth service (`/auth/v1/user`, admin endpoints).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub app_metadata: Value,
    #[serde(default)]
    pub user_metadata: Value,
}

impl AuthUser {
    /// Role written by the service into `app_metadata`. Client-writable metadata is ignored.
    pub fn role(&self) -> Option<&str> {
        self.app_metadata.get("role").and_then(|r| r.as_str())
    }

    pub fn has_admin_role(&self) -> bool {
        self.role() == Some(ADMIN_ROLE)
    }

    pub fn from_claims(claims: JwtClaims) -> Result<Self, uuid::Error> {
        Ok(Self {
            id: Uuid::parse_str(&claims.sub)?,
            email: claims.email.filter(|e| !e.is_empty()),
            app_metadata: claims.app_metadata,
            user_metadata: claims.user_metadata,
        })
    }
}

/// Public view of the current user.
#[derive(Debug, Serialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: String,
    pub is_admin: bool,
}
