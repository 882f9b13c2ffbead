use log::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::preferences::validate_coordinates;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding api error: {0}")]
    Api(String),
    #[error("no geocoding api key")]
    MissingKey,
    #[error("{0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub formatted: String,
    pub lat: f64,
    pub lng: f64,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    results: Vec<ApiResult>,
}

#[derive(Deserialize)]
struct ApiResult {
    formatted: String,
    geometry: Geometry,
    #[serde(default)]
    components: Components,
}

#[derive(Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize, Default)]
struct Components {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

impl From<ApiResult> for Place {
    fn from(r: ApiResult) -> Self {
        let c = r.components;
        Place {
            formatted: r.formatted,
            lat: r.geometry.lat,
            lng: r.geometry.lng,
            city: c.city.or(c.town).or(c.village),
            country: c.country,
        }
    }
}

/// Client for an OpenCage-compatible geocoding API.
#[derive(Clone)]
pub struct GeocodingService {
    client: Client,
    base_url: String,
    default_key: Option<String>,
}

impl GeocodingService {
    pub fn new(client: Client, base_url: &str, default_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_key,
        }
    }

    /// The caller's own key wins over the server key.
    fn resolve_key<'a>(&'a self, user_key: Option<&'a str>) -> Result<&'a str, GeocodeError> {
        user_key
            .filter(|k| !k.trim().is_empty())
            .or(self.default_key.as_deref())
            .ok_or(GeocodeError::MissingKey)
    }

    pub async fn forward(&self, query: &str, user_key: Option<&str>) -> Result<Vec<Place>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::InvalidInput("Search text is required".to_string()));
        }
        let key = self.resolve_key(user_key)?;
        self.call(query, key, 5).await
    }

    pub async fn reverse(&self, lat: f64, lng: f64, user_key: Option<&str>) -> Result<Option<Place>, GeocodeError> {
        validate_coordinates(lat, lng).map_err(GeocodeError::InvalidInput)?;
        let key = self.resolve_key(user_key)?;
        let places = self.call(&format!("{},{}", lat, lng), key, 1).await?;
        Ok(places.into_iter().next())
    }

    async fn call(&self, q: &str, key: &str, limit: u32) -> Result<Vec<Place>, GeocodeError> {
        let url = format!("{}/geocode/v1/json", self.base_url);
        let limit = limit.to_string();
        debug!("geocoding '{}'", q);

        let resp = self
            .client
            .get(&url)
            .query(&[("q", q), ("key", key), ("limit", limit.as_str()), ("no_annotations", "1")])
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GeocodeError::InvalidInput("Geocoding API key was rejected".to_string()));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GeocodeError::Api(format!("{} -> {}", status.as_u16(), text)));
        }

        let body: ApiResponse = resp.json().await?;
        Ok(body.results.into_iter().map(Place::from).collect())
    }
}
