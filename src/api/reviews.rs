use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AppState, CurrentUser};
use crate::domain::{Id, NewReview, Review};
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::sentiment::{blend_review_sentiment, text_fingerprint, SentimentLabel, SentimentResult, SentimentSummary};
use crate::service;

const MAX_COMMENT_CHARS: usize = 5_000;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", get(for_product).delete(remove))
        .route("/{id}/sentiment-summary", get(summary))
}

#[derive(Deserialize)]
struct ReviewCreate {
    product_id: Id,
    rating: f64,
    #[serde(default)]
    comment: String,
}

#[derive(Serialize)]
struct ReviewCreated {
    review: Review,
    text_sentiment: SentimentResult,
    trust_score: u8,
}

/// Submitted rating clamped to 1..=5, and the whole stars stored for it.
/// The blend sees the fractional value; only the stored rating truncates.
fn rating_parts(rating: f64) -> ApiResult<(f64, u8)> {
    if !rating.is_finite() {
        return Err(ApiError::BadRequest("rating must be a number".into()));
    }
    let clamped = rating.clamp(1.0, 5.0);
    Ok((clamped, clamped as u8))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ReviewCreate>,
) -> ApiResult<(StatusCode, Json<ReviewCreated>)> {
    let (submitted, rating) = rating_parts(body.rating)?;
    if body.comment.chars().count() > MAX_COMMENT_CHARS {
        return Err(ApiError::BadRequest(format!(
            "comment longer than {MAX_COMMENT_CHARS} characters"
        )));
    }
    state.product_or_404(body.product_id).await?;

    let text_sentiment = state.analyzer.analyze(&body.comment);
    metrics::sentiment_analyzed();
    let sentiment_score = blend_review_sentiment(submitted, &body.comment);

    let review = state
        .store
        .insert_review(NewReview {
            product_id: body.product_id,
            author_id: Some(user.id),
            reviewer_name: user.full_name.clone().unwrap_or_else(|| "Anonymous".into()),
            rating,
            comment: body.comment,
            sentiment_score,
        })
        .await?;
    metrics::review_created();
    info!(
        review_id = review.id,
        product_id = review.product_id,
        rating,
        sentiment = sentiment_score,
        text = %text_fingerprint(&review.comment),
        "review created"
    );

    let trust_score = service::refresh_trust_score(state.store.as_ref(), review.product_id)
        .await?
        .map(|(p, _)| p.trust_score)
        .ok_or_else(|| ApiError::not_found("Product", review.product_id))?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewCreated {
            review,
            text_sentiment,
            trust_score,
        }),
    ))
}

#[derive(Serialize)]
struct ReviewView {
    #[serde(flatten)]
    review: Review,
    sentiment_label: SentimentLabel,
}

async fn for_product(
    State(state): State<AppState>,
    Path(product_id): Path<Id>,
) -> ApiResult<Json<Vec<ReviewView>>> {
    state.product_or_404(product_id).await?;
    let rows = state.store.reviews_for_product(product_id).await?;
    Ok(Json(
        rows.into_iter()
            .map(|review| ReviewView {
                sentiment_label: SentimentLabel::from_review_sentiment(review.sentiment_score),
                review,
            })
            .collect(),
    ))
}

async fn summary(
    State(state): State<AppState>,
    Path(product_id): Path<Id>,
) -> ApiResult<Json<SentimentSummary>> {
    state.product_or_404(product_id).await?;
    let rows = state.store.reviews_for_product(product_id).await?;
    Ok(Json(SentimentSummary::from_reviews(&rows)))
}

#[derive(Serialize)]
struct ReviewDeleted {
    deleted: bool,
    review_id: Id,
    trust_score: Option<u8>,
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(review_id): Path<Id>,
) -> ApiResult<Json<ReviewDeleted>> {
    let review = state
        .store
        .review(review_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review", review_id))?;
    if review.author_id != Some(user.id) {
        return Err(ApiError::Forbidden("Only the author can delete a review".into()));
    }
    state.store.delete_review(review_id).await?;
    info!(review_id, product_id = review.product_id, "review deleted");

    // The product may have been removed independently; the delete still stands.
    let trust_score = service::refresh_trust_score(state.store.as_ref(), review.product_id)
        .await?
        .map(|(p, _)| p.trust_score);

    Ok(Json(ReviewDeleted {
        deleted: true,
        review_id,
        trust_score,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_clamps_and_stores_whole_stars() {
        assert_eq!(rating_parts(4.9).unwrap(), (4.9, 4));
        assert_eq!(rating_parts(0.0).unwrap(), (1.0, 1));
        assert_eq!(rating_parts(9.0).unwrap(), (5.0, 5));
        assert!(rating_parts(f64::NAN).is_err());
    }

    #[test]
    fn blend_uses_the_fractional_rating() {
        let (submitted, stored) = rating_parts(4.9).unwrap();
        // 0.6 * 0.98 + 0.4 * 0.5 = 0.788
        assert_eq!(blend_review_sentiment(submitted, ""), 0.79);
        assert_eq!(blend_review_sentiment(f64::from(stored), ""), 0.68);
    }
}
