//! # Sentiment Analyzer
//! Keyword-lexicon scoring of free-form review text.
//!
//! Tokens are whitespace-separated, lowercased, and stripped of non-alphanumeric
//! characters before lexicon lookup. Processing is strictly left-to-right with
//! one token of lookback:
//! - a negator arms negation and consumes nothing,
//! - the next sentiment word flips polarity and disarms it,
//! - any other word disarms it too (negation is not transitive),
//! - an intensifier directly before a sentiment word doubles that hit.
//!
//! Matched-word lists are sets while the hit counts are not, so a repeated word
//! raises confidence but is reported once.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::domain::Review;

static LEXICON: Lazy<Arc<Lexicon>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    Arc::new(serde_json::from_str::<Lexicon>(raw).expect("valid sentiment lexicon"))
});

/// Label thresholds on the [-1, 1] score.
const POSITIVE_ABOVE: f64 = 0.2;
const NEGATIVE_BELOW: f64 = -0.2;

/// Hits needed for full confidence.
const FULL_CONFIDENCE_HITS: f64 = 5.0;
/// Confidence reported when text has words but none carry sentiment.
const NO_SIGNAL_CONFIDENCE: f64 = 0.2;

/// Review-level thresholds on the blended [0, 1] sentiment.
const REVIEW_POSITIVE_ABOVE: f64 = 0.6;
const REVIEW_NEGATIVE_BELOW: f64 = 0.4;

/// Share of the star rating in a blended review sentiment (text gets the rest).
const REVIEW_RATING_SHARE: f64 = 0.6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Lexicon {
    pub positive: HashSet<String>,
    pub negative: HashSet<String>,
    pub intensifiers: HashSet<String>,
    pub negators: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    fn from_score(score: f64) -> Self {
        if score > POSITIVE_ABOVE {
            Self::Positive
        } else if score < NEGATIVE_BELOW {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Label for a stored review sentiment in [0, 1].
    pub fn from_review_sentiment(value: f64) -> Self {
        if value > REVIEW_POSITIVE_ABOVE {
            Self::Positive
        } else if value < REVIEW_NEGATIVE_BELOW {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// In [-1, 1], two decimals.
    pub score: f64,
    pub label: SentimentLabel,
    /// In [0, 1], two decimals.
    pub confidence: f64,
    pub matched_positive_words: Vec<String>,
    pub matched_negative_words: Vec<String>,
}

impl SentimentResult {
    fn empty() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            matched_positive_words: Vec::new(),
            matched_negative_words: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    /// Analyzer over the built-in lexicon.
    pub fn new() -> Self {
        Self {
            lexicon: Arc::clone(&LEXICON),
        }
    }

    /// Analyzer over a caller-provided lexicon.
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self {
            lexicon: Arc::new(lexicon),
        }
    }

    pub fn analyze(&self, text: &str) -> SentimentResult {
        if text.is_empty() {
            return SentimentResult::empty();
        }

        let lex = &self.lexicon;
        let raw: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();

        let mut positive_hits = 0usize;
        let mut negative_hits = 0usize;
        let mut positive_words = BTreeSet::new();
        let mut negative_words = BTreeSet::new();
        let mut negation_active = false;

        for (i, word) in raw.iter().enumerate() {
            let clean = strip_non_alphanumeric(word);

            if lex.negators.contains(&clean) {
                negation_active = true;
                continue;
            }

            // Lookback is on the raw token, so "very," does not intensify.
            let intensified = i > 0 && lex.intensifiers.contains(&raw[i - 1]);
            let weight = if intensified { 2 } else { 1 };

            if lex.positive.contains(&clean) {
                if negation_active {
                    negative_hits += 1;
                    negative_words.insert(clean);
                    negation_active = false;
                } else {
                    positive_hits += weight;
                    positive_words.insert(clean);
                }
            } else if lex.negative.contains(&clean) {
                if negation_active {
                    positive_hits += 1;
                    positive_words.insert(clean);
                    negation_active = false;
                } else {
                    negative_hits += weight;
                    negative_words.insert(clean);
                }
            } else {
                negation_active = false;
            }
        }

        let total = positive_hits + negative_hits;
        let (score, confidence) = if total == 0 {
            (0.0, NO_SIGNAL_CONFIDENCE)
        } else {
            let score = (positive_hits as f64 - negative_hits as f64) / total as f64;
            (score, (total as f64 / FULL_CONFIDENCE_HITS).min(1.0))
        };

        SentimentResult {
            score: round2(score),
            label: SentimentLabel::from_score(score),
            confidence: round2(confidence),
            matched_positive_words: positive_words.into_iter().collect(),
            matched_negative_words: negative_words.into_iter().collect(),
        }
    }
}

/// Analyze with the built-in lexicon.
pub fn analyze_sentiment(text: &str) -> SentimentResult {
    SentimentAnalyzer::new().analyze(text)
}

/// Sentiment mapped from [-1, 1] onto [0, 100].
pub fn storage_score(text: &str) -> f64 {
    round2((analyze_sentiment(text).score + 1.0) * 50.0)
}

/// Blend a star rating with the comment's sentiment into [0, 1].
/// This is the value persisted as a review's `sentiment_score`.
pub fn blend_review_sentiment(rating: f64, text: &str) -> f64 {
    let rating_part = rating.clamp(0.0, 5.0) / 5.0;
    let text_part = (analyze_sentiment(text).score + 1.0) / 2.0;
    round2(rating_part * REVIEW_RATING_SHARE + text_part * (1.0 - REVIEW_RATING_SHARE))
}

/// Per-product roll-up of stored review sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub total_reviews: usize,
    pub average_rating: f64,
    /// Integer percent; 50 when there are no reviews.
    pub average_sentiment: u8,
    pub sentiment_label: SentimentLabel,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
}

impl SentimentSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self {
                total_reviews: 0,
                average_rating: 0.0,
                average_sentiment: 50,
                sentiment_label: SentimentLabel::Neutral,
                positive_count: 0,
                negative_count: 0,
                neutral_count: 0,
            };
        }

        let total = reviews.len();
        let avg_rating = reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / total as f64;
        let avg_sentiment = reviews.iter().map(|r| r.sentiment_score).sum::<f64>() / total as f64;

        let mut positive = 0;
        let mut negative = 0;
        for r in reviews {
            match SentimentLabel::from_review_sentiment(r.sentiment_score) {
                SentimentLabel::Positive => positive += 1,
                SentimentLabel::Negative => negative += 1,
                SentimentLabel::Neutral => {}
            }
        }

        Self {
            total_reviews: total,
            average_rating: (avg_rating * 10.0).round_ties_even() / 10.0,
            average_sentiment: (avg_sentiment * 100.0).clamp(0.0, 100.0) as u8,
            sentiment_label: SentimentLabel::from_review_sentiment(avg_sentiment),
            positive_count: positive,
            negative_count: negative,
            neutral_count: total - positive - negative,
        }
    }
}

/// Short, stable fingerprint of a text for logs (never log raw review text).
pub(crate) fn text_fingerprint(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn strip_non_alphanumeric(word: &str) -> String {
    word.chars().filter(|c| c.is_alphanumeric()).collect()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_neutral_with_zero_confidence() {
        let r = analyze_sentiment("");
        assert_eq!(r.score, 0.0);
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert_eq!(r.confidence, 0.0);
        assert!(r.matched_positive_words.is_empty());
        assert!(r.matched_negative_words.is_empty());
    }

    #[test]
    fn no_sentiment_words_gives_low_confidence() {
        let r = analyze_sentiment("the dashboard loads on monday");
        assert_eq!(r.score, 0.0);
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert!((r.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn negation_flips_next_sentiment_word() {
        let r = analyze_sentiment("not good");
        assert!(r.score <= 0.0);
        assert_eq!(r.label, SentimentLabel::Negative);
        assert_eq!(r.matched_negative_words, vec!["good"]);
    }

    #[test]
    fn negation_does_not_skip_over_neutral_words() {
        // "the" clears the pending negation before "great" is reached.
        let r = analyze_sentiment("not the great one");
        assert_eq!(r.label, SentimentLabel::Positive);
        assert_eq!(r.matched_positive_words, vec!["great"]);
    }

    #[test]
    fn negated_negative_counts_positive() {
        let r = analyze_sentiment("not bad");
        assert_eq!(r.score, 1.0);
        assert_eq!(r.matched_positive_words, vec!["bad"]);
    }

    #[test]
    fn intensifier_doubles_the_hit() {
        let plain = analyze_sentiment("good");
        let boosted = analyze_sentiment("very good");
        assert_eq!(plain.score, 1.0);
        assert_eq!(boosted.score, 1.0);
        assert!(boosted.confidence > plain.confidence);
        assert!((boosted.confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn intensifier_with_trailing_punctuation_is_ignored() {
        let r = analyze_sentiment("very, good");
        assert!((r.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn repeated_words_inflate_counts_but_list_once() {
        let r = analyze_sentiment("great great great bad");
        assert_eq!(r.matched_positive_words, vec!["great"]);
        assert_eq!(r.matched_negative_words, vec!["bad"]);
        // 3 positive vs 1 negative.
        assert_eq!(r.score, 0.5);
        assert!((r.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn punctuation_is_stripped_before_lookup() {
        let r = analyze_sentiment("Amazing! Really intuitive, but slow.");
        assert_eq!(r.matched_positive_words, vec!["amazing", "intuitive"]);
        assert_eq!(r.matched_negative_words, vec!["slow"]);
        // amazing(1) + really intuitive(2) vs slow(1)
        assert_eq!(r.score, 0.5);
        assert_eq!(r.label, SentimentLabel::Positive);
    }

    #[test]
    fn mixed_text_lands_neutral() {
        let r = analyze_sentiment("good but buggy");
        assert_eq!(r.score, 0.0);
        assert_eq!(r.label, SentimentLabel::Neutral);
    }

    #[test]
    fn custom_lexicon_is_used() {
        let mut lex = Lexicon::default();
        lex.positive.insert("stonks".into());
        let a = SentimentAnalyzer::with_lexicon(lex);
        assert_eq!(a.analyze("stonks").label, SentimentLabel::Positive);
        assert_eq!(a.analyze("great").label, SentimentLabel::Neutral);
    }

    #[test]
    fn storage_score_maps_onto_percent() {
        assert_eq!(storage_score("great"), 100.0);
        assert_eq!(storage_score("terrible"), 0.0);
        assert_eq!(storage_score("meh"), 50.0);
    }

    #[test]
    fn blended_review_sentiment() {
        // 0.6 * 1.0 + 0.4 * 1.0
        assert_eq!(blend_review_sentiment(5.0, "great"), 1.0);
        // 0.6 * 0.2 + 0.4 * 0.0
        assert_eq!(blend_review_sentiment(1.0, "awful"), 0.12);
        // 0.6 * 0.6 + 0.4 * 0.5
        assert_eq!(blend_review_sentiment(3.0, ""), 0.56);
    }

    #[test]
    fn review_label_thresholds() {
        assert_eq!(SentimentLabel::from_review_sentiment(0.61), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_review_sentiment(0.6), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_review_sentiment(0.4), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_review_sentiment(0.39), SentimentLabel::Negative);
    }

    #[test]
    fn fingerprint_is_short_hex() {
        let f = text_fingerprint("hello");
        assert_eq!(f.len(), 12);
        assert!(f.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(f, text_fingerprint("hello"));
    }
}
