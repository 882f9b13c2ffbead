use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::models::category::{Category, CategoryFields};
use super::{Query, RepoError, SupabaseRest};

pub const TABLE: &str = "service_categories";

#[derive(Clone)]
pub struct CategoryRepository {
    rest: SupabaseRest,
}

impl CategoryRepository {
    pub fn new(rest: SupabaseRest) -> Self {
        Self { rest }
    }

    pub async fn list(&self) -> Result<Vec<Category>, RepoError> {
        self.rest.select(TABLE, Query::new().order("name", false)).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, RepoError> {
        self.rest.select_one(TABLE, Query::new().eq("id", id)).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Category, RepoError> {
        self.rest.select_one(TABLE, Query::new().eq("slug", slug)).await
    }

    pub async fn insert(&self, fields: &CategoryFields) -> Result<Category, RepoError> {
        self.rest.insert(TABLE, fields).await
    }

    pub async fn rename(&self, id: Uuid, fields: &CategoryFields) -> Result<Category, RepoError> {
        #[derive(Serialize)]
        struct Patch<'a> {
            name: &'a str,
            slug: &'a str,
            updated_at: String,
        }
        let patch = Patch {
            name: &fields.name,
            slug: &fields.slug,
            updated_at: Utc::now().to_rfc3339(),
        };
        let rows: Vec<Category> = self
            .rest
            .update(TABLE, Query::new().eq("id", id), &patch)
            .await?;
        rows.into_iter().next().ok_or(RepoError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rest.delete(TABLE, Query::new().eq("id", id)).await
    }
}
