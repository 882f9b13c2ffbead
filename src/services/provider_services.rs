// src/services/provider_services.rs
use log::{info, warn};
use uuid::Uuid;

use crate::dtos::provider_dtos::{
    cards_with_ratings, sort_cards, AdminDetailOut, AdminTabsOut, BrowseQuery, CategoryDetailOut,
    ProviderCard, ProviderDetailOut, RegistrationIn, StatsOut, StepCheckOut,
};
use crate::dtos::review_dtos::ReviewsOut;
use crate::error::ApiError;
use crate::models::provider::{AdminAction, ProviderDraft, ProviderStatus, ServiceProvider, WIZARD_STEPS};
use crate::models::review::{NewReview, RatingSummary, Review};
use crate::repositories::category_repository::CategoryRepository;
use crate::repositories::provider_repository::{self, ProviderFilter, ProviderRepository};
use crate::repositories::review_repository::{self, ReviewRepository};
use crate::repositories::RepoError;
use crate::services::change_feed::{ChangeEvent, ChangeFeed, ChangeKind};
use crate::services::storage_service::{decode_image, object_path, StorageService};

/// Provider lifecycle: registration wizard, public browsing, reviews and the admin status workflow.
#[derive(Clone)]
pub struct ProviderService {
    pub providers: ProviderRepository,
    pub categories: CategoryRepository,
    pub reviews: ReviewRepository,
    pub storage: StorageService,
    pub feed: ChangeFeed,
    pub profile_image_bucket: String,
    pub id_proof_bucket: String,
    pub max_upload_bytes: usize,
}

impl ProviderService {
    /// Checks one wizard step. Step 2 also requires the chosen category to exist.
    pub async fn validate_step(&self, step: u8, draft: &ProviderDraft) -> Result<StepCheckOut, ApiError> {
        let missing = draft.missing_fields(step).map_err(ApiError::BadRequest)?;

        if step == 2 && missing.is_empty() {
            if let Some(cat) = draft.service_category {
                self.require_category(cat).await?;
            }
        }

        let complete = missing.is_empty();
        Ok(StepCheckOut {
            step,
            complete,
            missing,
            next_step: if complete && step < WIZARD_STEPS { Some(step + 1) } else { None },
        })
    }

    /// Final submission. Images are uploaded before the row is written, so a failed upload leaves nothing behind
    /// in the table.
    pub async fn submit(&self, user_id: Uuid, input: RegistrationIn) -> Result<ServiceProvider, ApiError> {
        let RegistrationIn { mut draft, profile_image, id_proof } = input;
        draft.has_id_proof = id_proof.is_some();

        let missing = draft.missing_all();
        if !missing.is_empty() {
            return Err(ApiError::BadRequest(format!(
                "Please fill in all required fields: {}",
                missing.join(", ")
            )));
        }

        let category = draft
            .service_category
            .ok_or_else(|| ApiError::BadRequest("Please choose a service category".to_string()))?;
        self.require_category(category).await?;

        if self.providers.exists_for_user(user_id).await? {
            return Err(ApiError::Conflict(
                "You have already registered as a service provider".to_string(),
            ));
        }

        // decode both before uploading either
        let profile = profile_image
            .as_ref()
            .map(|img| decode_image(img, self.max_upload_bytes))
            .transpose()?;
        let id_proof = id_proof
            .as_ref()
            .ok_or_else(|| ApiError::BadRequest("ID proof is required".to_string()))?;
        let id_bytes = decode_image(id_proof, self.max_upload_bytes)?;

        let profile_image_url = match profile {
            Some(img) => {
                let path = object_path(user_id, "profile", img.extension);
                Some(self.storage.upload(&self.profile_image_bucket, &path, img).await?)
            }
            None => None,
        };

        let id_path = object_path(user_id, "id-proof", id_bytes.extension);
        let id_proof_url = self.storage.upload(&self.id_proof_bucket, &id_path, id_bytes).await?;

        let row = draft.into_new_provider(user_id, category, profile_image_url, id_proof_url);
        let saved = self.providers.insert(&row).await?;
        info!("provider {} registered by {} ({})", saved.id, user_id, id_proof.file_name);

        self.feed.publish(
            ChangeEvent::new(provider_repository::TABLE, ChangeKind::Insert, saved.id)
                .with_status(saved.status),
        );
        Ok(saved)
    }

    pub async fn my_listing(&self, user_id: Uuid) -> Result<ServiceProvider, ApiError> {
        self.providers
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("You have not registered as a provider yet".to_string()))
    }

    pub async fn browse(&self, query: BrowseQuery) -> Result<Vec<ProviderCard>, ApiError> {
        let filter = ProviderFilter {
            status: Some(ProviderStatus::Approved),
            category: query.category,
            city: query.city,
            search: query.q,
        };
        let rows = self.providers.list(&filter).await?;
        let mut cards = self.with_ratings(rows).await?;
        sort_cards(&mut cards, query.sort);
        Ok(cards)
    }

    /// Category page: the category plus its approved providers.
    pub async fn category_detail(&self, slug: &str) -> Result<CategoryDetailOut, ApiError> {
        let category = match self.categories.get_by_slug(slug).await {
            Ok(c) => c,
            Err(RepoError::NotFound) => {
                return Err(ApiError::NotFound(format!("Category '{}' not found", slug)))
            }
            Err(e) => return Err(e.into()),
        };
        let providers = self
            .browse(BrowseQuery { category: Some(category.id), ..Default::default() })
            .await?;
        Ok(CategoryDetailOut { category, providers })
    }

    /// Worker profile. Only approved listings are public.
    pub async fn public_detail(&self, id: Uuid) -> Result<ProviderDetailOut, ApiError> {
        let provider = self.approved(id).await?;
        let reviews = self.reviews.list_for_provider(id).await?;
        let rating = RatingSummary::from_ratings(reviews.iter().map(|r| r.rating));
        let category = match provider.service_category {
            Some(cat) => self.categories.get(cat).await.ok(),
            None => None,
        };

        let phone = provider.phone.clone();
        let address = provider.address.clone();
        Ok(ProviderDetailOut {
            provider: ProviderCard::new(provider, rating),
            phone,
            address,
            category,
            reviews,
        })
    }

    pub async fn reviews_for(&self, provider_id: Uuid) -> Result<ReviewsOut, ApiError> {
        self.approved(provider_id).await?;
        let reviews = self.reviews.list_for_provider(provider_id).await?;
        Ok(ReviewsOut {
            summary: RatingSummary::from_ratings(reviews.iter().map(|r| r.rating)),
            reviews,
        })
    }

    pub async fn add_review(
        &self,
        provider_id: Uuid,
        user_id: Uuid,
        rating: i16,
        comment: Option<String>,
    ) -> Result<Review, ApiError> {
        let review = NewReview::new(provider_id, user_id, rating, comment).map_err(ApiError::BadRequest)?;
        self.approved(provider_id).await?;

        let saved = self.reviews.insert(&review).await?;
        self.feed.publish(ChangeEvent::new(review_repository::TABLE, ChangeKind::Insert, saved.id));
        Ok(saved)
    }

    pub async fn admin_tabs(&self, status: Option<ProviderStatus>) -> Result<AdminTabsOut, ApiError> {
        let rows = self
            .providers
            .list(&ProviderFilter { status, ..Default::default() })
            .await?;
        Ok(AdminTabsOut::partition(rows))
    }

    pub async fn admin_detail(&self, id: Uuid) -> Result<AdminDetailOut, ApiError> {
        let provider = self.get(id).await?;
        let category = match provider.service_category {
            Some(cat) => self.categories.get(cat).await.ok(),
            None => None,
        };
        Ok(AdminDetailOut { provider: provider.into(), category })
    }

    /// Applies an admin action. Undefined actions for the current status are refused without writing.
    pub async fn apply_action(&self, id: Uuid, action: AdminAction) -> Result<ServiceProvider, ApiError> {
        let current = self.get(id).await?;
        let Some(next) = action.apply(current.status) else {
            warn!("refused {} on provider {} in status {}", action.as_str(), id, current.status);
            return Err(ApiError::Conflict(format!(
                "Cannot {} a provider that is {}",
                action.as_str(),
                current.status
            )));
        };

        let updated = self.providers.update_status(id, next).await.map_err(|e| match e {
            RepoError::NotFound => ApiError::NotFound("Provider not found".to_string()),
            other => other.into(),
        })?;
        info!("provider {}: {} -> {}", id, current.status, updated.status);

        self.feed.publish(
            ChangeEvent::new(provider_repository::TABLE, ChangeKind::Update, id).with_status(updated.status),
        );
        Ok(updated)
    }

    pub async fn stats(&self) -> Result<StatsOut, ApiError> {
        let statuses = self.providers.all_statuses().await?;
        let categories = self.categories.list().await?.len();
        Ok(StatsOut::from_statuses(&statuses, categories))
    }

    async fn get(&self, id: Uuid) -> Result<ServiceProvider, ApiError> {
        self.providers.get(id).await.map_err(|e| match e {
            RepoError::NotFound => ApiError::NotFound("Provider not found".to_string()),
            other => other.into(),
        })
    }

    async fn approved(&self, id: Uuid) -> Result<ServiceProvider, ApiError> {
        let p = self.get(id).await?;
        if p.status != ProviderStatus::Approved {
            return Err(ApiError::NotFound("Provider not found".to_string()));
        }
        Ok(p)
    }

    async fn require_category(&self, id: Uuid) -> Result<(), ApiError> {
        match self.categories.get(id).await {
            Ok(_) => Ok(()),
            Err(RepoError::NotFound) => {
                Err(ApiError::BadRequest("Selected category does not exist".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn with_ratings(&self, rows: Vec<ServiceProvider>) -> Result<Vec<ProviderCard>, ApiError> {
        let ids: Vec<Uuid> = rows.iter().map(|p| p.id).collect();
        let ratings = self.reviews.summaries(&ids).await?;
        Ok(cards_with_ratings(rows, &ratings))
    }
}
