//! # Signal Normalizers
//! Raw legitimacy observations → 0..=100 sub-scores.
//!
//! Everything here is total: out-of-domain inputs (negative counts, ratings
//! outside 1..=5) are clamped, never rejected.

use serde::{Deserialize, Serialize};

/// Domain must be at least this old (years) to earn the age half of data integrity.
const MIN_ESTABLISHED_DOMAIN_YEARS: i64 = 2;

/// Raw observations for one scoring request. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalInputs {
    pub has_https: bool,
    #[serde(default)]
    pub domain_age_years: i64,
    #[serde(default)]
    pub employee_count: i64,
    pub average_rating: f64,
}

/// The three normalized components of the trust score, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub data_integrity: u8,
    pub market_traction: u8,
    pub user_sentiment: u8,
}

impl SubScores {
    /// Safe constructor with clamping.
    pub fn new(data_integrity: u8, market_traction: u8, user_sentiment: u8) -> Self {
        Self {
            data_integrity: data_integrity.min(100),
            market_traction: market_traction.min(100),
            user_sentiment: user_sentiment.min(100),
        }
    }

    /// Same value for all three components (used for fresh products without signals).
    pub fn uniform(v: u8) -> Self {
        Self::new(v, v, v)
    }

    pub fn from_signals(inputs: &SignalInputs) -> Self {
        Self {
            data_integrity: normalize_data_integrity(inputs.has_https, inputs.domain_age_years),
            market_traction: normalize_market_traction(inputs.employee_count),
            user_sentiment: normalize_user_sentiment(inputs.average_rating),
        }
    }
}

/// +50 for HTTPS, +50 for a domain aged two years or more.
pub fn normalize_data_integrity(has_https: bool, domain_age_years: i64) -> u8 {
    let mut score: u8 = 0;
    if has_https {
        score += 50;
    }
    if domain_age_years >= MIN_ESTABLISHED_DOMAIN_YEARS {
        score += 50;
    }
    score.min(100)
}

/// Team-size step function: `<10 → 30`, `10..=50 → 60`, `>50 → 90`.
pub fn normalize_market_traction(employee_count: i64) -> u8 {
    match employee_count {
        n if n < 10 => 30,
        10..=50 => 60,
        _ => 90,
    }
}

/// Linear 1..=5 star → 0..=100 scaling. Rating is clamped first.
pub fn normalize_user_sentiment(average_rating: f64) -> u8 {
    let rating = average_rating.clamp(1.0, 5.0);
    let scaled = ((rating - 1.0) / 4.0) * 100.0;
    // NaN casts to 0, which is the floor of the range anyway.
    scaled.round_ties_even().clamp(0.0, 100.0) as u8
}
