//! Stateless scoring utilities: the core composers behind plain JSON.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::AppState;
use crate::analyze::{
    assess_signals, match_buyers, position_quadrant, BuyerMatch, CredibilityInputs,
    CredibilityResult, QuadrantPosition, TrustAssessment,
};
use crate::metrics;
use crate::sentiment::SentimentResult;
use crate::signals::SignalInputs;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/sentiment", post(sentiment))
        .route("/trust", post(trust))
        .route("/credibility", post(credibility))
        .route("/quadrant", get(quadrant))
        .route("/matches", get(matches))
}

#[derive(Deserialize)]
struct SentimentReq {
    text: String,
}

async fn sentiment(
    State(state): State<AppState>,
    Json(body): Json<SentimentReq>,
) -> Json<SentimentResult> {
    metrics::sentiment_analyzed();
    Json(state.analyzer.analyze(&body.text))
}

async fn trust(Json(inputs): Json<SignalInputs>) -> Json<TrustAssessment> {
    Json(assess_signals(&inputs))
}

async fn credibility(Json(inputs): Json<CredibilityInputs>) -> Json<CredibilityResult> {
    let result = inputs.compose();
    metrics::credibility_observed(result.overall_score);
    Json(result)
}

/// Out-of-range query values clamp into 0..=100.
fn score_param(v: i64) -> u8 {
    v.clamp(0, 100) as u8
}

#[derive(Deserialize)]
struct QuadrantQuery {
    credibility: i64,
    traction: i64,
}

async fn quadrant(Query(q): Query<QuadrantQuery>) -> Json<QuadrantPosition> {
    Json(position_quadrant(
        score_param(q.credibility),
        score_param(q.traction),
    ))
}

#[derive(Deserialize)]
struct MatchQuery {
    category: String,
    trust_score: i64,
    traction: i64,
}

async fn matches(Query(q): Query<MatchQuery>) -> Json<Vec<BuyerMatch>> {
    Json(match_buyers(
        &q.category,
        score_param(q.trust_score),
        score_param(q.traction),
    ))
}
