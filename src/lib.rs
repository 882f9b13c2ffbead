pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::Config;
use crate::repositories::category_repository::CategoryRepository;
use crate::repositories::provider_repository::ProviderRepository;
use crate::repositories::review_repository::ReviewRepository;
use crate::repositories::settings_repository::SettingsRepository;
use crate::repositories::SupabaseRest;
use crate::services::auth_services::AuthService;
use crate::services::category_services::CategoryService;
use crate::services::change_feed::ChangeFeed;
use crate::services::geocoding_service::GeocodingService;
use crate::services::provider_services::ProviderService;
use crate::services::storage_service::StorageService;

const CHANGE_FEED_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub providers: ProviderService,
    pub categories: CategoryService,
    pub settings: SettingsRepository,
    pub geocoding: GeocodingService,
    pub feed: ChangeFeed,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("servicemart-be/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()
            .context("failed to build http client")?;

        let rest = SupabaseRest::new(
            http_client.clone(),
            &config.supabase_url,
            &config.supabase_service_role_key,
        );
        let provider_repo = ProviderRepository::new(rest.clone());
        let category_repo = CategoryRepository::new(rest.clone());
        let feed = ChangeFeed::new(CHANGE_FEED_CAPACITY);

        let providers = ProviderService {
            providers: provider_repo.clone(),
            categories: category_repo.clone(),
            reviews: ReviewRepository::new(rest.clone()),
            storage: StorageService::new(
                http_client.clone(),
                &config.supabase_url,
                &config.supabase_service_role_key,
            ),
            feed: feed.clone(),
            profile_image_bucket: config.profile_image_bucket.clone(),
            id_proof_bucket: config.id_proof_bucket.clone(),
            max_upload_bytes: config.max_upload_bytes,
        };

        let categories = CategoryService {
            categories: category_repo,
            providers: provider_repo,
            feed: feed.clone(),
        };

        Ok(Self {
            auth: AuthService::new(http_client.clone(), &config),
            providers,
            categories,
            settings: SettingsRepository::new(rest),
            geocoding: GeocodingService::new(
                http_client,
                &config.geocoding_base_url,
                config.geocoding_api_key.clone(),
            ),
            feed,
            config,
        })
    }
}
