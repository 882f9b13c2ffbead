use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::upload_dtos::ImageUpload;
use crate::models::category::Category;
use crate::models::provider::{AdminAction, ProviderDraft, ProviderStatus, ServiceProvider};
use crate::models::review::{RatingSummary, Review};

/// Final wizard submission.
#[derive(Deserialize)]
pub struct RegistrationIn {
    #[serde(flatten)]
    pub draft: ProviderDraft,
    pub profile_image: Option<ImageUpload>,
    pub id_proof: Option<ImageUpload>,
}

#[derive(Serialize)]
pub struct StepCheckOut {
    pub step: u8,
    pub complete: bool,
    pub missing: Vec<&'static str>,
    pub next_step: Option<u8>,
}

#[derive(Serialize)]
pub struct OptionsOut {
    pub experience: Vec<&'static str>,
    pub price_ranges: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Rating,
    Name,
}

#[derive(Deserialize, Default)]
pub struct BrowseQuery {
    pub category: Option<Uuid>,
    pub city: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// Provider as shown in listings. The ID proof never leaves the admin views.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderCard {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub service_category: Option<Uuid>,
    pub experience: Option<String>,
    pub price_range: Option<String>,
    pub about: Option<String>,
    pub profile_image_url: Option<String>,
    pub rating: RatingSummary,
    #[serde(skip)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ProviderCard {
    pub fn new(p: ServiceProvider, rating: RatingSummary) -> Self {
        Self {
            id: p.id,
            name: p.name,
            city: p.city,
            service_category: p.service_category,
            experience: p.experience,
            price_range: p.price_range,
            about: p.about,
            profile_image_url: p.profile_image_url,
            rating,
            created_at: p.created_at,
        }
    }
}

pub fn cards_with_ratings(
    providers: Vec<ServiceProvider>,
    ratings: &HashMap<Uuid, RatingSummary>,
) -> Vec<ProviderCard> {
    providers
        .into_iter()
        .map(|p| {
            let r = ratings.get(&p.id).copied().unwrap_or_default();
            ProviderCard::new(p, r)
        })
        .collect()
}

/// Orders cards in place. `Newest` keeps the store order (created_at desc).
pub fn sort_cards(cards: &mut [ProviderCard], order: SortOrder) {
    match order {
        SortOrder::Newest => cards.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Name => cards.sort_by_key(|c| c.name.to_lowercase()),
        SortOrder::Rating => cards.sort_by(|a, b| {
            let ra = a.rating.average.unwrap_or(-1.0);
            let rb = b.rating.average.unwrap_or(-1.0);
            rb.total_cmp(&ra).then(b.rating.count.cmp(&a.rating.count))
        }),
    }
}

#[derive(Serialize)]
pub struct ProviderDetailOut {
    pub provider: ProviderCard,
    pub phone: String,
    pub address: String,
    pub category: Option<Category>,
    pub reviews: Vec<Review>,
}

#[derive(Serialize)]
pub struct CategoryDetailOut {
    pub category: Category,
    pub providers: Vec<ProviderCard>,
}

#[derive(Serialize)]
pub struct AdminProviderOut {
    #[serde(flatten)]
    pub provider: ServiceProvider,
    pub actions: Vec<AdminAction>,
}

impl From<ServiceProvider> for AdminProviderOut {
    fn from(provider: ServiceProvider) -> Self {
        let actions = AdminAction::available_for(provider.status);
        Self { provider, actions }
    }
}

#[derive(Serialize, Default)]
pub struct AdminTabsOut {
    pub pending: Vec<AdminProviderOut>,
    pub approved: Vec<AdminProviderOut>,
    pub rejected: Vec<AdminProviderOut>,
    pub suspended: Vec<AdminProviderOut>,
}

impl AdminTabsOut {
    pub fn partition(rows: Vec<ServiceProvider>) -> Self {
        let mut tabs = Self::default();
        for row in rows {
            let tab = match row.status {
                ProviderStatus::Pending => &mut tabs.pending,
                ProviderStatus::Approved => &mut tabs.approved,
                ProviderStatus::Rejected => &mut tabs.rejected,
                ProviderStatus::Suspended => &mut tabs.suspended,
            };
            tab.push(row.into());
        }
        tabs
    }
}

#[derive(Deserialize, Default)]
pub struct AdminListQuery {
    pub status: Option<ProviderStatus>,
}

#[derive(Serialize)]
pub struct AdminDetailOut {
    pub provider: AdminProviderOut,
    pub category: Option<Category>,
}

#[derive(Serialize, Default, Debug, PartialEq)]
pub struct StatsOut {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub suspended: usize,
    pub categories: usize,
}

impl StatsOut {
    pub fn from_statuses(statuses: &[ProviderStatus], categories: usize) -> Self {
        let count = |s: ProviderStatus| statuses.iter().filter(|x| **x == s).count();
        Self {
            total: statuses.len(),
            pending: count(ProviderStatus::Pending),
            approved: count(ProviderStatus::Approved),
            rejected: count(ProviderStatus::Rejected),
            suspended: count(ProviderStatus::Suspended),
            categories,
        }
    }
}
