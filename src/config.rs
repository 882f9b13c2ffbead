use std::env;
use std::time::Duration;
use anyhow::{Context, Result};

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
    /// HS256 secret for access tokens. Without it tokens are checked against `/auth/v1/user`.
    pub jwt_secret: Option<String>,
    /// Emails that are granted the admin role on first admin visit.
    pub admin_emails: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub profile_image_bucket: String,
    pub id_proof_bucket: String,
    pub max_upload_bytes: usize,
    pub geocoding_base_url: String,
    pub geocoding_api_key: Option<String>,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let supabase_url = env::var("SUPABASE_URL")
            .context("SUPABASE_URL not set")?
            .trim()
            .trim_end_matches('/')
            .to_string();
        let supabase_service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .context("SUPABASE_SERVICE_ROLE_KEY not set")?
            .trim()
            .to_string();
        let supabase_anon_key =
            anon_key_or_service(env::var("SUPABASE_ANON_KEY").ok(), &supabase_service_role_key);

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(v) => v.parse::<usize>().context("MAX_UPLOAD_BYTES must be a number")?,
            Err(_) => 5 * 1024 * 1024,
        };

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(v.parse::<u64>().context("HTTP_TIMEOUT_SECS must be a number")?),
            Err(_) => Duration::from_secs(30),
        };

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            supabase_service_role_key,
            jwt_secret: non_empty(env::var("SUPABASE_JWT_SECRET").ok()),
            admin_emails: split_list(&env::var("ADMIN_EMAILS").unwrap_or_default())
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            allowed_origins: split_list(
                &env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into()),
            ),
            port,
            profile_image_bucket: env::var("PROFILE_IMAGE_BUCKET")
                .unwrap_or_else(|_| "profile-images".to_string()),
            id_proof_bucket: env::var("ID_PROOF_BUCKET")
                .unwrap_or_else(|_| "provider-documents".to_string()),
            max_upload_bytes,
            geocoding_base_url: env::var("GEOCODING_BASE_URL")
                .unwrap_or_else(|_| "https://api.opencagedata.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            geocoding_api_key: non_empty(env::var("GEOCODING_API_KEY").ok()),
            http_timeout,
        })
    }

    pub fn is_bootstrap_admin(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        !email.is_empty() && self.admin_emails.iter().any(|e| *e == email)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// The public auth endpoints fall back to the service key when no anon key is set.
fn anon_key_or_service(anon: Option<String>, service_key: &str) -> String {
    non_empty(anon).unwrap_or_else(|| service_key.to_string())
}

/// Shortens a secret for log output.
pub fn mask_key(k: &str) -> String {
    let chars: Vec<char> = k.chars().collect();
    if chars.len() <= 8 { return "[REDACTED]".to_string(); }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list(" a@x.io, ,b@y.io,"), vec!["a@x.io", "b@y.io"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn blank_anon_key_falls_back_to_service_key() {
        assert_eq!(anon_key_or_service(Some("  ".into()), "service"), "service");
        assert_eq!(anon_key_or_service(Some(String::new()), "service"), "service");
        assert_eq!(anon_key_or_service(None, "service"), "service");
        assert_eq!(anon_key_or_service(Some(" anon ".into()), "service"), "anon");
    }

    #[test]
    fn mask_key_hides_middle() {
        assert_eq!(mask_key("short"), "[REDACTED]");
        assert_eq!(mask_key("abcd1234efgh"), "abcd***efgh");
    }
}
