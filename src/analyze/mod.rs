// src/analyze/mod.rs
//! Scoring pipeline: sub-scores → trust → credibility → badge/quadrant/insights.
//! Matchmaking consumes trust and category independently.
//!
//! Everything below is pure and synchronous; callers resolve aggregates
//! (upvotes, review stats) and pass them in.

pub mod credibility;
pub mod matchmaking;
pub mod quadrant;
pub mod rules;
pub mod scoring;
pub mod weights;

use serde::Serialize;

use crate::signals::{SignalInputs, SubScores};

// Re-export convenient types.
pub use crate::analyze::credibility::{
    compose_credibility, CredibilityBreakdown, CredibilityInputs, CredibilityResult,
};
pub use crate::analyze::matchmaking::{match_buyers, BuyerMatch, BuyerPersona, BUYER_PERSONAS};
pub use crate::analyze::quadrant::{position_quadrant, Coordinates, Quadrant, QuadrantPosition};
pub use crate::analyze::rules::{badge_for, Badge, BadgeTier};
pub use crate::analyze::scoring::{
    compose_dynamic_trust, compose_trust_score, trust_from_sub_scores, DynamicTrust, TrustBreakdown,
};
pub use crate::analyze::weights::{CredibilityWeights, ReviewSignalWeights, TrustWeights};

/// Signals straight through to a trust score, with the intermediate sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrustAssessment {
    pub sub_scores: SubScores,
    pub trust_score: u8,
}

pub fn assess_signals(inputs: &SignalInputs) -> TrustAssessment {
    let sub_scores = SubScores::from_signals(inputs);
    TrustAssessment {
        trust_score: trust_from_sub_scores(&sub_scores),
        sub_scores,
    }
}
