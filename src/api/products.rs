use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use super::{AppState, CurrentUser};
use crate::badge::EmbedLevel;
use crate::domain::{Id, Product, ProductDetails, ProductSubmission};
use crate::error::{ApiError, ApiResult};
use crate::service;
use crate::signals::SubScores;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/mine", get(mine))
        .route("/{id}", get(fetch).put(update))
        .route("/{id}/score", get(score))
}

fn validate(details: &ProductDetails) -> ApiResult<()> {
    if details.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    if details.website.trim().is_empty() {
        return Err(ApiError::BadRequest("website must not be empty".into()));
    }
    Ok(())
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ProductSubmission>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    validate(&body.details)?;
    let product = service::create_product(state.store.as_ref(), &state.config, body, Some(user.id)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.store.list_products().await?))
}

async fn mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.store.products_by_owner(user.id).await?))
}

async fn fetch(State(state): State<AppState>, Path(id): Path<Id>) -> ApiResult<Json<Product>> {
    state.product_or_404(id).await.map(Json)
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Id>,
    Json(details): Json<ProductDetails>,
) -> ApiResult<Json<Product>> {
    validate(&details)?;
    let product = state.product_or_404(id).await?;
    if product.owner_id != Some(user.id) {
        return Err(ApiError::Forbidden("Only the product owner can edit it".into()));
    }
    let updated = state
        .store
        .update_product_details(id, details)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    info!(product_id = id, owner_id = user.id, "product updated");
    Ok(Json(updated))
}

#[derive(Serialize)]
struct ScoreView {
    product_id: Id,
    trust_score: u8,
    level: EmbedLevel,
    sub_scores: SubScores,
    baseline: SubScores,
}

async fn score(State(state): State<AppState>, Path(id): Path<Id>) -> ApiResult<Json<ScoreView>> {
    let p = state.product_or_404(id).await?;
    Ok(Json(ScoreView {
        product_id: p.id,
        trust_score: p.trust_score,
        level: EmbedLevel::from_trust(p.trust_score),
        sub_scores: p.current,
        baseline: p.baseline,
    }))
}
