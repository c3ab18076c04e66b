//! Fixed weight tables for the composers.
//!
//! Each table sums to 1.0. They are plain constants rather than runtime config,
//! so a deployment cannot ship a set that breaks the 0..=100 range.

use serde::Serialize;

/// Trust = traction · 0.40 + integrity · 0.35 + sentiment · 0.25
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrustWeights {
    pub market_traction: f64,
    pub data_integrity: f64,
    pub user_sentiment: f64,
}

impl TrustWeights {
    pub const DEFAULT: Self = Self {
        market_traction: 0.40,
        data_integrity: 0.35,
        user_sentiment: 0.25,
    };

    pub fn total(&self) -> f64 {
        self.market_traction + self.data_integrity + self.user_sentiment
    }
}

/// Credibility = launch · 0.30 + review · 0.30 + trust · 0.40
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CredibilityWeights {
    pub launch_signal: f64,
    pub review_signal: f64,
    pub trust_score: f64,
}

impl CredibilityWeights {
    pub const DEFAULT: Self = Self {
        launch_signal: 0.30,
        review_signal: 0.30,
        trust_score: 0.40,
    };

    pub fn total(&self) -> f64 {
        self.launch_signal + self.review_signal + self.trust_score
    }

    /// Human-readable shares, e.g. `"30%"`, for API responses.
    pub fn as_percentages(&self) -> WeightShares {
        fn pct(w: f64) -> String {
            format!("{}%", (w * 100.0).round() as i64)
        }
        WeightShares {
            launch_signal: pct(self.launch_signal),
            review_signal: pct(self.review_signal),
            trust_score: pct(self.trust_score),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeightShares {
    pub launch_signal: String,
    pub review_signal: String,
    pub trust_score: String,
}

/// Review signal = volume · 0.4 + quality · 0.6
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReviewSignalWeights {
    pub volume: f64,
    pub quality: f64,
}

impl ReviewSignalWeights {
    pub const DEFAULT: Self = Self {
        volume: 0.4,
        quality: 0.6,
    };

    pub fn total(&self) -> f64 {
        self.volume + self.quality
    }
}
