//! Trust Score Composer.
//!
//! `compose_trust_score` is the weighted blend of the three sub-scores.
//! `compose_dynamic_trust` is what callers must run after every review or
//! upvote mutation: it re-derives traction and sentiment from live aggregates
//! and adds the capped review bonus.

use serde::Serialize;

use super::weights::TrustWeights;
use crate::domain::ReviewStats;
use crate::signals::SubScores;

const MAX_UPVOTE_BONUS: u64 = 10;
const MAX_REVIEW_BONUS: u64 = 10;
const REVIEW_BONUS_PER_REVIEW: u64 = 2;

/// Weighted blend of the sub-scores, rounded half-to-even and clamped to 0..=100.
pub fn compose_trust_score(data_integrity: u8, market_traction: u8, user_sentiment: u8) -> u8 {
    let w = TrustWeights::DEFAULT;
    let raw = w.market_traction * f64::from(market_traction.min(100))
        + w.data_integrity * f64::from(data_integrity.min(100))
        + w.user_sentiment * f64::from(user_sentiment.min(100));
    to_score(raw)
}

/// Shorthand over a `SubScores` bundle.
pub fn trust_from_sub_scores(s: &SubScores) -> u8 {
    compose_trust_score(s.data_integrity, s.market_traction, s.user_sentiment)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrustBreakdown {
    pub data_integrity: u8,
    pub market_traction: u8,
    pub user_sentiment: u8,
    pub review_count: usize,
    pub upvotes: u64,
    pub review_bonus: u8,
    pub upvote_bonus: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DynamicTrust {
    pub score: u8,
    pub breakdown: TrustBreakdown,
}

impl DynamicTrust {
    /// Sub-scores the refresh settled on (integrity is carried from the baseline).
    pub fn sub_scores(&self) -> SubScores {
        SubScores::new(
            self.breakdown.data_integrity,
            self.breakdown.market_traction,
            self.breakdown.user_sentiment,
        )
    }
}

/// Recompute trust from the signal baseline plus live review/upvote aggregates.
///
/// The upvote bonus lifts market traction before blending; the review bonus is
/// added on top of the blended score. Starting from the baseline every time
/// keeps repeated refreshes idempotent.
pub fn compose_dynamic_trust(baseline: SubScores, reviews: &ReviewStats, upvotes: u64) -> DynamicTrust {
    let upvote_bonus = upvotes.min(MAX_UPVOTE_BONUS) as u8;
    let market_traction = baseline.market_traction.min(100).saturating_add(upvote_bonus).min(100);

    let (user_sentiment, review_bonus) = if reviews.count > 0 {
        let raw = (reviews.average_rating.clamp(0.0, 5.0) / 5.0) * 50.0
            + reviews.average_sentiment.clamp(0.0, 1.0) * 50.0;
        // Truncation, not rounding: the stored component is a floor.
        let sentiment = raw.clamp(0.0, 100.0) as u8;
        let bonus = (reviews.count as u64)
            .saturating_mul(REVIEW_BONUS_PER_REVIEW)
            .min(MAX_REVIEW_BONUS) as u8;
        (sentiment, bonus)
    } else {
        (baseline.user_sentiment.min(100), 0)
    };

    let blended = compose_trust_score(baseline.data_integrity, market_traction, user_sentiment);
    let score = blended.saturating_add(review_bonus).min(100);

    DynamicTrust {
        score,
        breakdown: TrustBreakdown {
            data_integrity: baseline.data_integrity.min(100),
            market_traction,
            user_sentiment,
            review_count: reviews.count,
            upvotes,
            review_bonus,
            upvote_bonus,
        },
    }
}

/// Round half-to-even and clamp into a 0..=100 score. NaN maps to 0.
pub(crate) fn to_score(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).round_ties_even() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes() {
        assert_eq!(compose_trust_score(100, 100, 100), 100);
        assert_eq!(compose_trust_score(0, 0, 0), 0);
    }

    #[test]
    fn weighted_blend() {
        // 0.40*60 + 0.35*100 + 0.25*75 = 24 + 35 + 18.75 = 77.75
        assert_eq!(compose_trust_score(100, 60, 75), 78);
        // 0.40*90 + 0.35*50 + 0.25*0 = 53.5 → 54 (ties to even)
        assert_eq!(compose_trust_score(50, 90, 0), 54);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        assert_eq!(compose_trust_score(255, 255, 255), 100);
    }

    #[test]
    fn dynamic_without_activity_matches_static() {
        let base = SubScores::uniform(70);
        let d = compose_dynamic_trust(base, &ReviewStats::default(), 0);
        assert_eq!(d.score, 70);
        assert_eq!(d.breakdown.review_bonus, 0);
        assert_eq!(d.breakdown.upvote_bonus, 0);
        assert_eq!(d.sub_scores(), base);
    }

    #[test]
    fn dynamic_applies_both_bonuses() {
        let base = SubScores::uniform(70);
        let stats = ReviewStats {
            count: 2,
            average_rating: 4.0,
            average_sentiment: 0.8,
        };
        let d = compose_dynamic_trust(base, &stats, 25);
        // traction 70+10 = 80; sentiment floor(40 + 40) = 80
        assert_eq!(d.breakdown.market_traction, 80);
        assert_eq!(d.breakdown.user_sentiment, 80);
        assert_eq!(d.breakdown.upvote_bonus, 10);
        assert_eq!(d.breakdown.review_bonus, 4);
        // 0.40*80 + 0.35*70 + 0.25*80 = 32 + 24.5 + 20 = 76.5 → 76, +4
        assert_eq!(d.score, 80);
    }

    #[test]
    fn dynamic_caps_at_one_hundred() {
        let base = SubScores::uniform(100);
        let stats = ReviewStats {
            count: 50,
            average_rating: 5.0,
            average_sentiment: 1.0,
        };
        let d = compose_dynamic_trust(base, &stats, 1_000);
        assert_eq!(d.score, 100);
        assert_eq!(d.breakdown.review_bonus, 10);
        assert_eq!(d.breakdown.market_traction, 100);
    }

    #[test]
    fn dynamic_refresh_is_idempotent() {
        let base = SubScores::new(50, 60, 40);
        let stats = ReviewStats {
            count: 3,
            average_rating: 3.7,
            average_sentiment: 0.55,
        };
        let a = compose_dynamic_trust(base, &stats, 7);
        let b = compose_dynamic_trust(base, &stats, 7);
        assert_eq!(a, b);
    }
}
