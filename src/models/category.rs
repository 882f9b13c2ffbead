use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Row of `service_categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryFields {
    pub name: String,
    pub slug: String,
}

impl CategoryFields {
    pub fn from_name(name: &str) -> Result<Self, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Category name is required".to_string());
        }
        if name.chars().count() > 100 {
            return Err("Category name must be less than 100 characters".to_string());
        }
        let slug = slugify(name);
        if slug.is_empty() {
            return Err("Category name must contain letters or digits".to_string());
        }
        Ok(Self { name: name.to_string(), slug })
    }
}

/// Lowercases `name` and joins its alphanumeric runs with `-`.
pub fn slugify(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}
