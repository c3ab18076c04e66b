//! Rule tables for the credibility composer.
//!
//! Badge tiers and insight lines are data, not code paths: each table is
//! walked in order and first match wins within a rule. Keeping them as tables
//! lets the boundaries be tested without going through score composition.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeTier {
    Elite,
    #[serde(rename = "Verified Leader")]
    VerifiedLeader,
    #[serde(rename = "Rising Star")]
    RisingStar,
    Validated,
    Emerging,
}

impl BadgeTier {
    pub fn label(&self) -> &'static str {
        match self {
            BadgeTier::Elite => "Elite",
            BadgeTier::VerifiedLeader => "Verified Leader",
            BadgeTier::RisingStar => "Rising Star",
            BadgeTier::Validated => "Validated",
            BadgeTier::Emerging => "Emerging",
        }
    }
}

/// One row of the tier table: scores `>= min_score` earn the tier.
#[derive(Debug, Clone, Copy)]
pub struct TierRule {
    pub min_score: u8,
    pub tier: BadgeTier,
    pub color: &'static str,
    pub icon: &'static str,
}

/// Descending, exhaustive over 0..=100 (the last row starts at 0).
pub const BADGE_TIERS: [TierRule; 5] = [
    TierRule { min_score: 90, tier: BadgeTier::Elite, color: "#FFD700", icon: "🏆" },
    TierRule { min_score: 80, tier: BadgeTier::VerifiedLeader, color: "#4CAF50", icon: "✅" },
    TierRule { min_score: 70, tier: BadgeTier::RisingStar, color: "#2196F3", icon: "⭐" },
    TierRule { min_score: 60, tier: BadgeTier::Validated, color: "#FF9800", icon: "✓" },
    TierRule { min_score: 0, tier: BadgeTier::Emerging, color: "#9E9E9E", icon: "🌱" },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub tier: BadgeTier,
    pub color: String,
    pub icon: String,
}

pub fn badge_for(score: u8) -> Badge {
    let rule = BADGE_TIERS
        .iter()
        .find(|r| score >= r.min_score)
        .unwrap_or(&BADGE_TIERS[BADGE_TIERS.len() - 1]);
    Badge {
        tier: rule.tier,
        color: rule.color.to_string(),
        icon: rule.icon.to_string(),
    }
}

/// Which number an insight rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Overall,
    LaunchSignal,
    ReviewSignal,
    TrustScore,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtLeast(f64),
    Below(f64),
    Always,
}

impl Bound {
    fn holds(&self, v: f64) -> bool {
        match *self {
            Bound::AtLeast(t) => v >= t,
            Bound::Below(t) => v < t,
            Bound::Always => true,
        }
    }
}

/// A rule emits at most one line: the first band whose bound holds.
/// Templates may reference `{upvotes}` and `{review_count}`.
#[derive(Debug, Clone, Copy)]
pub struct InsightRule {
    pub metric: Metric,
    pub bands: &'static [(Bound, &'static str)],
}

/// Fixed order: overall assessment, launch, review, trust.
pub const INSIGHT_RULES: [InsightRule; 4] = [
    InsightRule {
        metric: Metric::Overall,
        bands: &[
            (Bound::AtLeast(80.0), "🎯 Highly credible startup ready for enterprise pilots"),
            (Bound::AtLeast(60.0), "✓ Solid credibility, focus on building more social proof"),
            (Bound::Always, "🌱 Early stage, prioritize reviews and community engagement"),
        ],
    },
    InsightRule {
        metric: Metric::LaunchSignal,
        bands: &[
            (Bound::Below(30.0), "📢 Low launch momentum ({upvotes} upvotes) - consider re-launching"),
            (Bound::AtLeast(70.0), "🚀 Strong community buzz - leverage for enterprise outreach"),
        ],
    },
    InsightRule {
        metric: Metric::ReviewSignal,
        bands: &[
            (Bound::Below(40.0), "📝 Need more reviews ({review_count} submitted) - target 20+ for credibility"),
            (Bound::AtLeast(70.0), "⭐ Excellent user satisfaction - highlight in sales materials"),
        ],
    },
    InsightRule {
        metric: Metric::TrustScore,
        bands: &[
            (Bound::Below(60.0), "⚠️ Low trust score - verify data integrity and business metrics"),
            (Bound::AtLeast(80.0), "🔒 High trust score - strong legitimacy and traction signals"),
        ],
    },
];

/// Everything the insight templates can see.
#[derive(Debug, Clone, Copy)]
pub struct InsightContext {
    pub overall: u8,
    pub launch_signal: f64,
    pub review_signal: f64,
    pub trust_score: u8,
    pub upvotes: u64,
    pub review_count: u64,
}

impl InsightContext {
    fn value(&self, m: Metric) -> f64 {
        match m {
            Metric::Overall => f64::from(self.overall),
            Metric::LaunchSignal => self.launch_signal,
            Metric::ReviewSignal => self.review_signal,
            Metric::TrustScore => f64::from(self.trust_score),
        }
    }
}

pub fn apply_insight_rules(ctx: &InsightContext, rules: &[InsightRule]) -> Vec<String> {
    let mut out = Vec::new();
    for rule in rules {
        let v = ctx.value(rule.metric);
        if let Some((_, template)) = rule.bands.iter().find(|(b, _)| b.holds(v)) {
            out.push(render(template, ctx));
        }
    }
    out
}

fn render(template: &str, ctx: &InsightContext) -> String {
    template
        .replace("{upvotes}", &ctx.upvotes.to_string())
        .replace("{review_count}", &ctx.review_count.to_string())
}
