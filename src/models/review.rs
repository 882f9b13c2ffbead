use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row of `reviews`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub provider_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
}

impl NewReview {
    pub fn new(
        provider_id: Uuid,
        user_id: Uuid,
        rating: i16,
        comment: Option<String>,
    ) -> Result<Self, String> {
        if !(1..=5).contains(&rating) {
            return Err("Rating must be between 1 and 5".to_string());
        }

        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if let Some(ref c) = comment {
            if c.chars().count() > 1000 {
                return Err("Comment must be less than 1000 characters".to_string());
            }
        }

        Ok(Self { provider_id, user_id, rating, comment })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: usize,
}

impl RatingSummary {
    pub fn from_ratings<I: IntoIterator<Item = i16>>(ratings: I) -> Self {
        let (sum, count) = ratings
            .into_iter()
            .fold((0i64, 0usize), |(s, c), r| (s + r as i64, c + 1));
        let average = if count == 0 {
            None
        } else {
            // one decimal place
            Some(((sum as f64 / count as f64) * 10.0).round() / 10.0)
        };
        Self { average, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_must_be_one_to_five() {
        let p = Uuid::new_v4();
        let u = Uuid::new_v4();
        assert!(NewReview::new(p, u, 0, None).is_err());
        assert!(NewReview::new(p, u, 6, None).is_err());
        assert!(NewReview::new(p, u, 5, None).is_ok());
    }

    #[test]
    fn blank_comment_becomes_none() {
        let r = NewReview::new(Uuid::new_v4(), Uuid::new_v4(), 4, Some("  ".into())).unwrap();
        assert_eq!(r.comment, None);
    }

    #[test]
    fn summary_rounds_to_one_decimal() {
        let s = RatingSummary::from_ratings([5, 4, 4]);
        assert_eq!(s.count, 3);
        assert_eq!(s.average, Some(4.3));
        assert_eq!(RatingSummary::from_ratings(std::iter::empty::<i16>()).average, None);
    }
}
