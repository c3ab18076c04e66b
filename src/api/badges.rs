use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use super::AppState;
use crate::badge::{embed_badge, render_preview, trust_svg, EmbedBadge};
use crate::domain::Id;
use crate::error::ApiResult;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/{product_id}", get(badge_data))
        .route("/{product_id}/preview", get(preview))
        .route("/{product_id}/image", get(image))
}

async fn badge_data(
    State(state): State<AppState>,
    Path(product_id): Path<Id>,
) -> ApiResult<Json<EmbedBadge>> {
    let p = state.product_or_404(product_id).await?;
    Ok(Json(embed_badge(
        &p,
        &state.config.public_base_url,
        Utc::now().date_naive(),
        state.config.badge_valid_days,
    )))
}

async fn preview(
    State(state): State<AppState>,
    Path(product_id): Path<Id>,
) -> ApiResult<Html<String>> {
    let p = state.product_or_404(product_id).await?;
    Ok(Html(render_preview(&p, &state.config.public_base_url)))
}

pub(super) const SVG_CONTENT_TYPE: &str = "image/svg+xml";

async fn image(
    State(state): State<AppState>,
    Path(product_id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let p = state.product_or_404(product_id).await?;
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], trust_svg(&p)))
}
