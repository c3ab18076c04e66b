//! Marketplace entities as stored by a `MarketplaceRepository`.
//!
//! The scoring core never owns these; handlers resolve aggregates from them and
//! pass plain numbers into the composers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::signals::{SignalInputs, SubScores};

pub type Id = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Founder,
    Buyer,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    /// Identifier issued by the external identity provider.
    pub external_id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub company_name: Option<String>,
}

/// Payload of a sign-in/sign-up sync from the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSync {
    pub external_id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub company_name: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.company_name.is_none()
    }
}

/// Editable, owner-supplied product fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub website: String,
    pub category: String,
    pub funding_stage: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductSubmission {
    #[serde(flatten)]
    pub details: ProductDetails,
    /// Raw legitimacy signals; when absent the product starts from configured defaults.
    #[serde(default)]
    pub signals: Option<SignalInputs>,
}

/// Moderation state. New listings start pending until an admin reviews them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: Id,
    #[serde(flatten)]
    pub details: ProductDetails,
    pub owner_id: Option<Id>,
    pub status: ProductStatus,
    /// Signal-derived sub-scores; refreshes always start from these.
    pub baseline: SubScores,
    /// Sub-scores after the latest refresh.
    pub current: SubScores,
    pub trust_score: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub details: ProductDetails,
    pub owner_id: Option<Id>,
    pub baseline: SubScores,
    pub trust_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: Id,
    pub product_id: Id,
    pub author_id: Option<Id>,
    pub reviewer_name: String,
    /// Whole stars, 1..=5.
    pub rating: u8,
    pub comment: String,
    /// Blended rating/text sentiment in [0, 1].
    pub sentiment_score: f64,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: Id,
    pub author_id: Option<Id>,
    pub reviewer_name: String,
    pub rating: u8,
    pub comment: String,
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Launch {
    pub id: Id,
    pub product_id: Id,
    pub tagline: Option<String>,
    pub upvotes: u32,
    pub rank: u32,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    #[default]
    Open,
    Limited,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    pub id: Id,
    pub product_id: Id,
    pub startup_name: String,
    pub pilot_title: String,
    pub description: String,
    pub ideal_buyer: String,
    pub credibility_score: u8,
    pub pilot_duration: String,
    pub status: DealStatus,
}

#[derive(Debug, Clone)]
pub struct NewDeal {
    pub product_id: Id,
    pub startup_name: String,
    pub pilot_title: String,
    pub description: String,
    pub ideal_buyer: String,
    pub credibility_score: u8,
    pub pilot_duration: String,
    pub status: DealStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PilotStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PilotRequest {
    pub id: Id,
    pub deal_id: Id,
    pub company_name: String,
    pub contact_email: String,
    pub startup_name: String,
    pub status: PilotStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPilotRequest {
    pub deal_id: Id,
    pub company_name: String,
    pub contact_email: String,
    pub startup_name: String,
}

/// Live activity for one product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProductAggregates {
    /// Summed across every launch of the product.
    pub total_upvotes: u64,
    pub reviews: ReviewStats,
}

/// Review roll-up fed into the dynamic trust composer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ReviewStats {
    pub count: usize,
    /// 0.0 when there are no reviews.
    pub average_rating: f64,
    /// Mean stored sentiment in [0, 1]; 0.0 when there are no reviews.
    pub average_sentiment: f64,
}

impl ReviewStats {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        Self::from_iter(reviews)
    }
}

impl<'a> FromIterator<&'a Review> for ReviewStats {
    fn from_iter<I: IntoIterator<Item = &'a Review>>(iter: I) -> Self {
        let (mut count, mut rating, mut sentiment) = (0usize, 0.0, 0.0);
        for r in iter {
            count += 1;
            rating += f64::from(r.rating);
            sentiment += r.sentiment_score;
        }
        if count == 0 {
            return Self::default();
        }
        let n = count as f64;
        Self {
            count,
            average_rating: rating / n,
            average_sentiment: sentiment / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8, sentiment: f64) -> Review {
        Review {
            id: 1,
            product_id: 1,
            author_id: None,
            reviewer_name: "Anonymous".into(),
            rating,
            comment: String::new(),
            sentiment_score: sentiment,
            verified: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn review_stats_average() {
        let s = ReviewStats::from_reviews(&[review(5, 0.9), review(3, 0.5)]);
        assert_eq!(s.count, 2);
        assert!((s.average_rating - 4.0).abs() < 1e-9);
        assert!((s.average_sentiment - 0.7).abs() < 1e-9);
    }

    #[test]
    fn review_stats_empty_is_zeroed() {
        assert_eq!(ReviewStats::from_reviews(&[]), ReviewStats::default());
    }

    #[test]
    fn product_submission_accepts_flat_details_and_optional_signals() {
        let raw = r#"{
            "name": "Acme", "website": "https://acme.io", "category": "AI/ML",
            "funding_stage": "Series A",
            "signals": {"has_https": true, "domain_age_years": 3, "employee_count": 12, "average_rating": 4.5}
        }"#;
        let s: ProductSubmission = serde_json::from_str(raw).unwrap();
        assert_eq!(s.details.category, "AI/ML");
        assert!(s.signals.is_some());
        assert!(s.details.description.is_none());
    }
}
