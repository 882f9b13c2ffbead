#![allow(dead_code)]

use std::time::Duration;

use actix_web::web;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::MockServer;

use servicemart_be::config::Config;
use servicemart_be::AppState;

pub const JWT_SECRET: &str = "test-jwt-secret-for-servicemart";
pub const OWNER_EMAIL: &str = "owner@servicemart.test";

pub fn test_config(supabase_uri: &str) -> Config {
    Config {
        supabase_url: supabase_uri.to_string(),
        supabase_anon_key: "anon-key".to_string(),
        supabase_service_role_key: "service-role-key".to_string(),
        jwt_secret: Some(JWT_SECRET.to_string()),
        admin_emails: vec![OWNER_EMAIL.to_string()],
        allowed_origins: vec![],
        port: 0,
        profile_image_bucket: "profile-images".to_string(),
        id_proof_bucket: "provider-documents".to_string(),
        max_upload_bytes: 64 * 1024,
        geocoding_base_url: supabase_uri.to_string(),
        geocoding_api_key: None,
        http_timeout: Duration::from_secs(5),
    }
}

pub fn state(server: &MockServer) -> web::Data<AppState> {
    web::Data::new(AppState::new(test_config(&server.uri())).expect("state"))
}

/// Access token as Supabase would issue it.
pub fn token(user_id: Uuid, email: &str, app_metadata: Value, user_metadata: Value) -> String {
    let claims = json!({
        "sub": user_id.to_string(),
        "aud": "authenticated",
        "role": "authenticated",
        "exp": chrono::Utc::now().timestamp() + 3600,
        "email": email,
        "app_metadata": app_metadata,
        "user_metadata": user_metadata,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes()))
        .expect("token")
}

pub fn user_token(user_id: Uuid) -> String {
    token(user_id, "customer@example.com", json!({"provider": "email"}), json!({}))
}

pub fn admin_token(user_id: Uuid) -> String {
    token(user_id, "staff@example.com", json!({"role": "admin"}), json!({}))
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn provider_row(id: Uuid, user_id: Uuid, category: Uuid, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "name": "Asha Plumbing",
        "phone": "+91 98765 43210",
        "address": "12 MG Road",
        "city": "Pune",
        "service_category": category,
        "experience": "3-5 years",
        "price_range": "Moderate",
        "about": "Leak repairs and fittings",
        "profile_image_url": null,
        "id_proof_url": "https://example.supabase.co/storage/v1/object/public/provider-documents/x.jpg",
        "status": status,
        "created_at": "2024-05-01T10:00:00.000000+00:00",
        "updated_at": "2024-05-01T10:00:00.000000+00:00"
    })
}

pub fn category_row(id: Uuid, name: &str, slug: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": slug,
        "created_at": "2024-04-01T09:00:00+00:00",
        "updated_at": null
    })
}
