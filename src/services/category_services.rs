use log::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::category::{Category, CategoryFields};
use crate::repositories::category_repository::{self, CategoryRepository};
use crate::repositories::provider_repository::ProviderRepository;
use crate::repositories::RepoError;
use crate::services::change_feed::{ChangeEvent, ChangeFeed, ChangeKind};

/// Admin CRUD over service categories.
#[derive(Clone)]
pub struct CategoryService {
    pub categories: CategoryRepository,
    pub providers: ProviderRepository,
    pub feed: ChangeFeed,
}

impl CategoryService {
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        Ok(self.categories.list().await?)
    }

    pub async fn add(&self, name: &str) -> Result<Category, ApiError> {
        let fields = CategoryFields::from_name(name).map_err(ApiError::BadRequest)?;
        let saved = self.categories.insert(&fields).await?;
        info!("category {} added ({})", saved.id, saved.slug);
        self.feed.publish(ChangeEvent::new(category_repository::TABLE, ChangeKind::Insert, saved.id));
        Ok(saved)
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> Result<Category, ApiError> {
        let fields = CategoryFields::from_name(name).map_err(ApiError::BadRequest)?;
        let saved = self.categories.rename(id, &fields).await.map_err(not_found)?;
        self.feed.publish(ChangeEvent::new(category_repository::TABLE, ChangeKind::Update, id));
        Ok(saved)
    }

    /// Deletes an unused category. The usage check and the delete are separate calls.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.categories.get(id).await.map_err(not_found)?;

        let in_use = self.providers.count_in_category(id, 1).await?;
        if in_use > 0 {
            return Err(ApiError::Conflict(
                "This category is used by one or more providers and cannot be deleted".to_string(),
            ));
        }

        self.categories.delete(id).await?;
        info!("category {} deleted", id);
        self.feed.publish(ChangeEvent::new(category_repository::TABLE, ChangeKind::Delete, id));
        Ok(())
    }
}

fn not_found(e: RepoError) -> ApiError {
    match e {
        RepoError::NotFound => ApiError::NotFound("Category not found".to_string()),
        other => other.into(),
    }
}
