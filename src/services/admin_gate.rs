// src/services/admin_gate.rs
use log::{info, warn};
use serde_json::Value;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::user::{AuthUser, ADMIN_ROLE};
use crate::services::auth_services::AuthService;

/// Outcome of the admin check for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Unauthenticated,
    Denied,
    /// `promote` is set when access comes from the bootstrap email list
    /// and the role has not been written yet.
    Admin { promote: bool },
}

pub fn evaluate(user: Option<&AuthUser>, config: &Config) -> GateDecision {
    let Some(user) = user else {
        return GateDecision::Unauthenticated;
    };

    if user.has_admin_role() {
        return GateDecision::Admin { promote: false };
    }

    match user.email.as_deref() {
        Some(email) if config.is_bootstrap_admin(email) => GateDecision::Admin { promote: true },
        _ => GateDecision::Denied,
    }
}

/// Resolves the admin gate, writing the role for bootstrap admins.
pub async fn authorize(
    auth: &AuthService,
    config: &Config,
    user: Option<AuthUser>,
) -> Result<AuthUser, ApiError> {
    match evaluate(user.as_ref(), config) {
        GateDecision::Unauthenticated => Err(ApiError::Unauthenticated),
        GateDecision::Denied => {
            if let Some(u) = &user {
                warn!("admin access denied for user {}", u.id);
            }
            Err(ApiError::Forbidden)
        }
        GateDecision::Admin { promote } => {
            let Some(mut user) = user else {
                return Err(ApiError::Unauthenticated);
            };
            if promote {
                // access is granted even if the write fails; it is retried on the next visit
                match auth.set_role(&user, ADMIN_ROLE).await {
                    Ok(()) => {
                        info!("granted admin role to {}", user.id);
                        if let Value::Object(ref mut m) = user.app_metadata {
                            m.insert("role".to_string(), Value::String(ADMIN_ROLE.to_string()));
                        } else {
                            user.app_metadata = serde_json::json!({ "role": ADMIN_ROLE });
                        }
                    }
                    Err(e) => warn!("could not persist admin role for {}: {}", user.id, e),
                }
            }
            Ok(user)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use uuid::Uuid;

    fn config(admins: &[&str]) -> Config {
        Config {
            supabase_url: "http://localhost".into(),
            supabase_anon_key: "anon".into(),
            supabase_service_role_key: "service".into(),
            jwt_secret: None,
            admin_emails: admins.iter().map(|s| s.to_string()).collect(),
            allowed_origins: vec![],
            port: 8080,
            profile_image_bucket: "profile-images".into(),
            id_proof_bucket: "provider-documents".into(),
            max_upload_bytes: 1024,
            geocoding_base_url: "http://geo".into(),
            geocoding_api_key: None,
            http_timeout: Duration::from_secs(5),
        }
    }

    fn user(email: &str, app_metadata: Value) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            app_metadata,
            user_metadata: json!({}),
        }
    }

    #[test]
    fn no_session_is_unauthenticated() {
        assert_eq!(evaluate(None, &config(&[])), GateDecision::Unauthenticated);
    }

    #[test]
    fn plain_user_is_denied() {
        let u = user("someone@example.com", json!({"provider": "email"}));
        assert_eq!(evaluate(Some(&u), &config(&["boss@example.com"])), GateDecision::Denied);
    }

    #[test]
    fn role_metadata_grants_without_promotion() {
        let u = user("someone@example.com", json!({"role": "admin"}));
        assert_eq!(evaluate(Some(&u), &config(&[])), GateDecision::Admin { promote: false });
    }

    #[test]
    fn bootstrap_email_grants_and_promotes() {
        let u = user("Boss@Example.com", json!({}));
        assert_eq!(
            evaluate(Some(&u), &config(&["boss@example.com"])),
            GateDecision::Admin { promote: true }
        );
    }
}
