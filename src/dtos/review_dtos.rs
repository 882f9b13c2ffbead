use serde::{Deserialize, Serialize};

use crate::models::review::{RatingSummary, Review};

#[derive(Deserialize)]
pub struct ReviewIn {
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Serialize)]
pub struct ReviewsOut {
    pub summary: RatingSummary,
    pub reviews: Vec<Review>,
}
