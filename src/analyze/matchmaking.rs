//! Matchmaker: scores a startup against a fixed registry of buyer personas.
//!
//! Scoring per persona:
//! - category: exact member +40, else a persona category contained in the
//!   startup's category +20
//! - trust: at/above the persona minimum, +30 at 80+, +15 at 60+; below the
//!   minimum −20 (the raw score may go negative)
//! - traction: +30 at 60+, +15 at 40+
//!
//! Inclusion and the recommendation band use the raw score; the reported score
//! is clamped to 0..=100. Results are sorted descending and capped at five.

use serde::Serialize;

const MIN_INCLUDED_SCORE: i32 = 30;
const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct BuyerPersona {
    pub id: u32,
    pub buyer_type: &'static str,
    pub categories: &'static [&'static str],
    pub min_trust_score: u8,
    pub description: &'static str,
}

pub const BUYER_PERSONAS: [BuyerPersona; 5] = [
    BuyerPersona {
        id: 1,
        buyer_type: "Enterprise Fintech",
        categories: &["AI/ML", "FinTech", "Security"],
        min_trust_score: 75,
        description: "Large financial institutions seeking AI-powered solutions",
    },
    BuyerPersona {
        id: 2,
        buyer_type: "Tech Enterprise",
        categories: &["DevOps", "AI/ML", "Cloud"],
        min_trust_score: 70,
        description: "Technology companies modernizing their infrastructure",
    },
    BuyerPersona {
        id: 3,
        buyer_type: "Retail Chain",
        categories: &["AI/ML", "Analytics", "E-commerce"],
        min_trust_score: 65,
        description: "Retail enterprises optimizing operations with AI",
    },
    BuyerPersona {
        id: 4,
        buyer_type: "Healthcare Provider",
        categories: &["AI/ML", "HealthTech", "Security"],
        min_trust_score: 80,
        description: "Healthcare organizations with strict compliance needs",
    },
    BuyerPersona {
        id: 5,
        buyer_type: "Manufacturing Corp",
        categories: &["IoT", "AI/ML", "Analytics"],
        min_trust_score: 60,
        description: "Industrial enterprises adopting Industry 4.0",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyerMatch {
    pub buyer_type: String,
    pub description: String,
    pub match_score: u8,
    pub reasons: Vec<String>,
    pub recommendation: &'static str,
}

/// Raw (unclamped) score and reasons for one persona.
pub fn score_persona(
    persona: &BuyerPersona,
    category: &str,
    trust_score: u8,
    traction: u8,
) -> (i32, Vec<String>) {
    let mut score: i32 = 0;
    let mut reasons = Vec::new();

    if persona.categories.contains(&category) {
        score += 40;
        reasons.push(format!("Strong category fit: {category}"));
    } else if persona.categories.iter().any(|c| category.contains(c)) {
        score += 20;
        reasons.push("Partial category alignment".to_string());
    }

    if trust_score >= persona.min_trust_score {
        if trust_score >= 80 {
            score += 30;
            reasons.push(format!("High credibility (Trust Score: {trust_score})"));
        } else if trust_score >= 60 {
            score += 15;
            reasons.push(format!("Good credibility (Trust Score: {trust_score})"));
        }
    } else {
        score -= 20;
        reasons.push("Below trust threshold".to_string());
    }

    if traction >= 60 {
        score += 30;
        reasons.push("Strong market traction signals".to_string());
    } else if traction >= 40 {
        score += 15;
        reasons.push("Growing market presence".to_string());
    }

    (score, reasons)
}

pub fn recommendation_for(score: i32) -> &'static str {
    match score {
        s if s >= 80 => "Highly Recommended - Ideal enterprise fit",
        s if s >= 60 => "Recommended - Strong alignment potential",
        s if s >= 40 => "Consider - Worth exploring",
        _ => "Low Match - May require nurturing",
    }
}

/// Match against the built-in registry.
pub fn match_buyers(category: &str, trust_score: u8, traction: u8) -> Vec<BuyerMatch> {
    match_buyers_in(&BUYER_PERSONAS, category, trust_score, traction)
}

pub fn match_buyers_in(
    personas: &[BuyerPersona],
    category: &str,
    trust_score: u8,
    traction: u8,
) -> Vec<BuyerMatch> {
    let (trust_score, traction) = (trust_score.min(100), traction.min(100));
    let mut matches: Vec<BuyerMatch> = personas
        .iter()
        .filter_map(|p| {
            let (raw, reasons) = score_persona(p, category, trust_score, traction);
            (raw >= MIN_INCLUDED_SCORE).then(|| BuyerMatch {
                buyer_type: p.buyer_type.to_string(),
                description: p.description.to_string(),
                match_score: raw.clamp(0, 100) as u8,
                reasons,
                recommendation: recommendation_for(raw),
            })
        })
        .collect();

    // Stable: equal scores keep registry order.
    matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    matches.truncate(MAX_RESULTS);
    matches
}

/// Factor legend attached to matchmaking responses.
pub const MATCH_FACTORS: [&str; 3] = [
    "Category alignment (40%)",
    "Trust score threshold (30%)",
    "Market traction signals (30%)",
];
