//! Credibility Composer.
//!
//! Blends launch momentum (upvotes), review volume/quality and the trust score
//! into one 0..=100 number, then derives the badge tier and insight lines.
//! Always recomputed from current aggregates; never persisted.

use serde::{Deserialize, Serialize};

use super::rules::{apply_insight_rules, badge_for, Badge, InsightContext, INSIGHT_RULES};
use super::scoring::to_score;
use super::weights::{CredibilityWeights, ReviewSignalWeights, WeightShares};

/// Upvotes at which the launch signal saturates.
const LAUNCH_SATURATION_UPVOTES: f64 = 100.0;
/// Reviews at which review volume saturates.
const REVIEW_VOLUME_SATURATION: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityInputs {
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub review_count: i64,
    /// 0.0 when there are no reviews.
    #[serde(default)]
    pub average_rating: f64,
    pub trust_score: i64,
    #[serde(default = "default_funding_stage")]
    pub funding_stage: String,
}

fn default_funding_stage() -> String {
    "Series A".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CredibilityBreakdown {
    /// One decimal.
    pub launch_signal: f64,
    /// One decimal.
    pub review_signal: f64,
    pub trust_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredibilityResult {
    pub overall_score: u8,
    pub badge: Badge,
    pub breakdown: CredibilityBreakdown,
    pub weights: WeightShares,
    pub insights: Vec<String>,
    /// Informational only; does not affect the score.
    pub funding_stage: String,
}

/// `min(100, upvotes)`; negative counts read as zero.
pub fn launch_signal(upvotes: i64) -> f64 {
    let up = upvotes.max(0) as f64;
    (up / LAUNCH_SATURATION_UPVOTES * 100.0).min(100.0)
}

/// `0.4 · volume + 0.6 · quality`, each in 0..=100.
pub fn review_signal(review_count: i64, average_rating: f64) -> f64 {
    let w = ReviewSignalWeights::DEFAULT;
    let count = review_count.max(0) as f64;
    let volume = (count / REVIEW_VOLUME_SATURATION * 100.0).min(100.0);
    // A missing rating (0.0) contributes nothing.
    let rating = if average_rating.is_nan() { 0.0 } else { average_rating.clamp(0.0, 5.0) };
    let quality = rating / 5.0 * 100.0;
    volume * w.volume + quality * w.quality
}

pub fn compose_credibility(
    upvotes: i64,
    review_count: i64,
    average_rating: f64,
    trust_score: i64,
    funding_stage: &str,
) -> CredibilityResult {
    let w = CredibilityWeights::DEFAULT;
    let trust = trust_score.clamp(0, 100) as u8;

    let launch = launch_signal(upvotes);
    let review = review_signal(review_count, average_rating);

    let overall = to_score(
        w.launch_signal * launch + w.review_signal * review + w.trust_score * f64::from(trust),
    );

    let insights = apply_insight_rules(
        &InsightContext {
            overall,
            launch_signal: launch,
            review_signal: review,
            trust_score: trust,
            upvotes: upvotes.max(0) as u64,
            review_count: review_count.max(0) as u64,
        },
        &INSIGHT_RULES,
    );

    CredibilityResult {
        overall_score: overall,
        badge: badge_for(overall),
        breakdown: CredibilityBreakdown {
            launch_signal: round1(launch),
            review_signal: round1(review),
            trust_score: trust,
        },
        weights: w.as_percentages(),
        insights,
        funding_stage: funding_stage.to_string(),
    }
}

impl CredibilityInputs {
    pub fn compose(&self) -> CredibilityResult {
        compose_credibility(
            self.upvotes,
            self.review_count,
            self.average_rating,
            self.trust_score,
            &self.funding_stage,
        )
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}
