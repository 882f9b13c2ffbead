// src/models/provider.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Suggested buckets for the registration form. Free text is still accepted.
const EXPERIENCE_OPTIONS: &[&str] = &[
    "Less than 1 year",
    "1-3 years",
    "3-5 years",
    "5-10 years",
    "10+ years",
];

const PRICE_RANGE_OPTIONS: &[&str] = &[
    "Budget",
    "Moderate",
    "Premium",
    "Negotiable",
];

/// Marketplace visibility of a provider listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl ProviderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Pending => "pending",
            ProviderStatus::Approved => "approved",
            ProviderStatus::Rejected => "rejected",
            ProviderStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin actions on a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Approve,
    Reject,
    Suspend,
}

impl AdminAction {
    /// Status the listing ends up in, if the action is defined for `current`.
    ///
    /// approve: pending | rejected | suspended; reject: pending; suspend: approved.
    pub fn apply(self, current: ProviderStatus) -> Option<ProviderStatus> {
        use ProviderStatus::*;
        match (self, current) {
            (AdminAction::Approve, Pending | Rejected | Suspended) => Some(Approved),
            (AdminAction::Reject, Pending) => Some(Rejected),
            (AdminAction::Suspend, Approved) => Some(Suspended),
            _ => None,
        }
    }

    /// Actions offered for a listing in `status`.
    pub fn available_for(status: ProviderStatus) -> Vec<AdminAction> {
        [AdminAction::Approve, AdminAction::Reject, AdminAction::Suspend]
            .into_iter()
            .filter(|a| a.apply(status).is_some())
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::Approve => "approve",
            AdminAction::Reject => "reject",
            AdminAction::Suspend => "suspend",
        }
    }
}

impl FromStr for AdminAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" | "reactivate" => Ok(AdminAction::Approve),
            "reject" => Ok(AdminAction::Reject),
            "suspend" => Ok(AdminAction::Suspend),
            other => Err(format!("Unknown action '{}'", other)),
        }
    }
}

impl Serialize for AdminAction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Row of `service_providers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub service_category: Option<Uuid>,
    pub experience: Option<String>,
    pub price_range: Option<String>,
    pub about: Option<String>,
    pub profile_image_url: Option<String>,
    pub id_proof_url: Option<String>,
    pub status: ProviderStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert payload. Status is always `pending` on creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewServiceProvider {
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub service_category: Uuid,
    pub experience: String,
    pub price_range: String,
    pub about: String,
    pub profile_image_url: Option<String>,
    pub id_proof_url: String,
    pub status: ProviderStatus,
}

/// Wizard form contents. Every field is optional until the step that owns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub service_category: Option<Uuid>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub has_id_proof: bool,
}

pub const WIZARD_STEPS: u8 = 3;

impl ProviderDraft {
    /// Required fields of `step` that are still blank.
    pub fn missing_fields(&self, step: u8) -> Result<Vec<&'static str>, String> {
        let mut missing = Vec::new();
        match step {
            1 => {
                if self.name.trim().is_empty() { missing.push("name"); }
                if self.phone.trim().is_empty() { missing.push("phone"); }
                if self.address.trim().is_empty() { missing.push("address"); }
                if self.city.trim().is_empty() { missing.push("city"); }
            }
            2 => {
                if self.service_category.is_none() { missing.push("service_category"); }
                if self.experience.trim().is_empty() { missing.push("experience"); }
                if self.price_range.trim().is_empty() { missing.push("price_range"); }
                if self.about.trim().is_empty() { missing.push("about"); }
            }
            3 => {
                if !self.has_id_proof { missing.push("id_proof"); }
            }
            other => return Err(format!("Unknown registration step {}", other)),
        }
        Ok(missing)
    }

    /// Missing fields across every step, in step order.
    pub fn missing_all(&self) -> Vec<&'static str> {
        (1..=WIZARD_STEPS)
            .flat_map(|s| self.missing_fields(s).unwrap_or_default())
            .collect()
    }

    pub fn into_new_provider(
        self,
        user_id: Uuid,
        category: Uuid,
        profile_image_url: Option<String>,
        id_proof_url: String,
    ) -> NewServiceProvider {
        NewServiceProvider {
            user_id,
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            service_category: category,
            experience: self.experience.trim().to_string(),
            price_range: self.price_range.trim().to_string(),
            about: self.about.trim().to_string(),
            profile_image_url,
            id_proof_url,
            status: ProviderStatus::Pending,
        }
    }
}

pub fn experience_options() -> Vec<&'static str> {
    EXPERIENCE_OPTIONS.to_vec()
}

pub fn price_range_options() -> Vec<&'static str> {
    PRICE_RANGE_OPTIONS.to_vec()
}
