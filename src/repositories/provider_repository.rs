// src/repositories/provider_repository.rs
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::provider::{NewServiceProvider, ProviderStatus, ServiceProvider};
use super::{Query, RepoError, SupabaseRest};

pub const TABLE: &str = "service_providers";

/// Filters for the public provider list.
#[derive(Debug, Clone, Default)]
pub struct ProviderFilter {
    pub status: Option<ProviderStatus>,
    pub category: Option<Uuid>,
    pub city: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct ProviderRepository {
    rest: SupabaseRest,
}

impl ProviderRepository {
    pub fn new(rest: SupabaseRest) -> Self {
        Self { rest }
    }

    pub async fn list(&self, filter: &ProviderFilter) -> Result<Vec<ServiceProvider>, RepoError> {
        let mut q = Query::new().select("*");
        if let Some(status) = filter.status {
            q = q.eq("status", status);
        }
        if let Some(cat) = filter.category {
            q = q.eq("service_category", cat);
        }
        if let Some(city) = filter.city.as_deref().filter(|c| !c.trim().is_empty()) {
            q = q.ilike_exact("city", city);
        }
        if let Some(term) = filter.search.as_deref() {
            q = q.search_any(&["name", "about", "city"], term);
        }
        self.rest.select(TABLE, q.order("created_at", true)).await
    }

    pub async fn get(&self, id: Uuid) -> Result<ServiceProvider, RepoError> {
        self.rest.select_one(TABLE, Query::new().eq("id", id)).await
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<ServiceProvider>, RepoError> {
        match self.rest.select_one(TABLE, Query::new().eq("user_id", user_id)).await {
            Ok(p) => Ok(Some(p)),
            Err(RepoError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn exists_for_user(&self, user_id: Uuid) -> Result<bool, RepoError> {
        #[derive(Deserialize)]
        struct IdOnly {
            #[allow(dead_code)]
            id: Uuid,
        }
        let rows: Vec<IdOnly> = self
            .rest
            .select(TABLE, Query::new().select("id").eq("user_id", user_id).limit(1))
            .await?;
        Ok(!rows.is_empty())
    }

    /// Number of providers in `category`, capped at `limit`.
    pub async fn count_in_category(&self, category: Uuid, limit: u32) -> Result<usize, RepoError> {
        #[derive(Deserialize)]
        struct IdOnly {
            #[allow(dead_code)]
            id: Uuid,
        }
        let rows: Vec<IdOnly> = self
            .rest
            .select(
                TABLE,
                Query::new().select("id").eq("service_category", category).limit(limit),
            )
            .await?;
        Ok(rows.len())
    }

    /// `(status)` of every row, for dashboard counts.
    pub async fn all_statuses(&self) -> Result<Vec<ProviderStatus>, RepoError> {
        #[derive(Deserialize)]
        struct StatusOnly {
            status: ProviderStatus,
        }
        let rows: Vec<StatusOnly> = self
            .rest
            .select(TABLE, Query::new().select("status"))
            .await?;
        Ok(rows.into_iter().map(|r| r.status).collect())
    }

    pub async fn insert(&self, row: &NewServiceProvider) -> Result<ServiceProvider, RepoError> {
        self.rest.insert(TABLE, row).await
    }

    /// Sets `status` and `updated_at`. No version check: the last write wins.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: ProviderStatus,
    ) -> Result<ServiceProvider, RepoError> {
        #[derive(Serialize)]
        struct Patch {
            status: ProviderStatus,
            updated_at: String,
        }
        let patch = Patch { status, updated_at: Utc::now().to_rfc3339() };
        let rows: Vec<ServiceProvider> = self
            .rest
            .update(TABLE, Query::new().eq("id", id), &patch)
            .await?;
        rows.into_iter().next().ok_or(RepoError::NotFound)
    }
}
