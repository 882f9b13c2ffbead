use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;

use crate::models::review::{NewReview, RatingSummary, Review};
use super::{Query, RepoError, SupabaseRest};

pub const TABLE: &str = "reviews";

#[derive(Clone)]
pub struct ReviewRepository {
    rest: SupabaseRest,
}

impl ReviewRepository {
    pub fn new(rest: SupabaseRest) -> Self {
        Self { rest }
    }

    pub async fn list_for_provider(&self, provider_id: Uuid) -> Result<Vec<Review>, RepoError> {
        self.rest
            .select(
                TABLE,
                Query::new().eq("provider_id", provider_id).order("created_at", true),
            )
            .await
    }

    pub async fn insert(&self, review: &NewReview) -> Result<Review, RepoError> {
        self.rest.insert(TABLE, review).await
    }

    /// Rating summaries keyed by provider, for the given providers only.
    pub async fn summaries(
        &self,
        provider_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, RatingSummary>, RepoError> {
        if provider_ids.is_empty() {
            return Ok(HashMap::new());
        }

        #[derive(Deserialize)]
        struct RatingRow {
            provider_id: Uuid,
            rating: i16,
        }

        let rows: Vec<RatingRow> = self
            .rest
            .select(
                TABLE,
                Query::new()
                    .select("provider_id,rating")
                    .in_list("provider_id", provider_ids),
            )
            .await?;

        let mut grouped: HashMap<Uuid, Vec<i16>> = HashMap::new();
        for row in rows {
            grouped.entry(row.provider_id).or_default().push(row.rating);
        }
        Ok(grouped
            .into_iter()
            .map(|(id, ratings)| (id, RatingSummary::from_ratings(ratings)))
            .collect())
    }
}
