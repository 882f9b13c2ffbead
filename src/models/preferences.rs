// src/models/preferences.rs
use serde::{Deserialize, Serialize};

use crate::config::mask_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Location {
    pub fn validate(&self) -> Result<(), String> {
        validate_coordinates(self.lat, self.lng)
    }
}

pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), String> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err("Latitude must be between -90 and 90".to_string());
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err("Longitude must be between -180 and 180".to_string());
    }
    Ok(())
}

/// UI preferences, stored under `user_metadata.preferences`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub font_size: FontSize,
    pub language: String,
    pub last_location: Option<Location>,
    pub geocoding_api_key: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            font_size: FontSize::Medium,
            language: "en".to_string(),
            last_location: None,
            geocoding_api_key: None,
        }
    }
}

/// Partial update. `Some("")` for the API key clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesPatch {
    pub dark_mode: Option<bool>,
    pub font_size: Option<FontSize>,
    pub language: Option<String>,
    pub last_location: Option<Location>,
    pub geocoding_api_key: Option<String>,
}

impl Preferences {
    pub fn from_user_metadata(meta: &serde_json::Value) -> Self {
        meta.get("preferences")
            .cloned()
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default()
    }

    pub fn apply(&mut self, patch: PreferencesPatch) -> Result<(), String> {
        if let Some(lang) = patch.language {
            let lang = lang.trim();
            let valid = (2..=5).contains(&lang.len())
                && lang.chars().all(|c| c.is_ascii_alphabetic() || c == '-');
            if !valid {
                return Err("Language must be a 2-5 letter code such as 'en' or 'pt-BR'".to_string());
            }
            self.language = lang.to_string();
        }
        if let Some(loc) = patch.last_location {
            loc.validate()?;
            self.last_location = Some(loc);
        }
        if let Some(key) = patch.geocoding_api_key {
            let key = key.trim();
            self.geocoding_api_key = if key.is_empty() { None } else { Some(key.to_string()) };
        }
        if let Some(dark) = patch.dark_mode {
            self.dark_mode = dark;
        }
        if let Some(size) = patch.font_size {
            self.font_size = size;
        }
        Ok(())
    }

    /// Copy safe to send back to clients.
    pub fn masked(&self) -> Self {
        Self {
            geocoding_api_key: self.geocoding_api_key.as_deref().map(mask_key),
            ..self.clone()
        }
    }
}
