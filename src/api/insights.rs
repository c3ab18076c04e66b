use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::badges::SVG_CONTENT_TYPE;
use super::{AppState, ProductRef};
use crate::badge::render_svg;
use crate::analyze::{position_quadrant, Badge, Coordinates, CredibilityResult, Quadrant};
use crate::domain::Id;
use crate::error::ApiResult;
use crate::service;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/quadrant", get(quadrant))
        .route("/{product_id}/credibility", get(credibility))
        .route("/{product_id}/badge", get(badge))
        .route("/{product_id}/badge/image", get(badge_image))
}

#[derive(Serialize)]
struct RawMetrics {
    total_upvotes: u64,
    review_count: usize,
    average_rating: f64,
}

#[derive(Serialize)]
struct CredibilityView {
    #[serde(flatten)]
    result: CredibilityResult,
    product: ProductRef,
    raw_metrics: RawMetrics,
}

async fn credibility(
    State(state): State<AppState>,
    Path(product_id): Path<Id>,
) -> ApiResult<Json<CredibilityView>> {
    let product = state.product_or_404(product_id).await?;
    let (result, agg) = service::credibility_for(state.store.as_ref(), &product).await?;
    Ok(Json(CredibilityView {
        result,
        product: ProductRef::from(&product),
        raw_metrics: RawMetrics {
            total_upvotes: agg.total_upvotes,
            review_count: agg.reviews.count,
            average_rating: (agg.reviews.average_rating * 100.0).round_ties_even() / 100.0,
        },
    }))
}

#[derive(Serialize)]
struct QuadrantEntry {
    product: ProductRef,
    overall_score: u8,
    badge: Badge,
    quadrant: Quadrant,
    coordinates: Coordinates,
}

#[derive(Serialize)]
struct QuadrantLegend {
    quadrant: Quadrant,
    legend: &'static str,
}

#[derive(Serialize)]
struct QuadrantView {
    title: &'static str,
    description: &'static str,
    products: Vec<QuadrantEntry>,
    quadrants: Vec<QuadrantLegend>,
}

/// Portfolio view: credibility on x, the stored market-traction sub-score on y.
async fn quadrant(State(state): State<AppState>) -> ApiResult<Json<QuadrantView>> {
    let mut products = Vec::new();
    for p in state.store.list_products().await? {
        let (cred, _) = service::credibility_for(state.store.as_ref(), &p).await?;
        let pos = position_quadrant(cred.overall_score, p.current.market_traction);
        products.push(QuadrantEntry {
            product: ProductRef::from(&p),
            overall_score: cred.overall_score,
            badge: cred.badge,
            quadrant: pos.quadrant,
            coordinates: pos.coordinates,
        });
    }
    Ok(Json(QuadrantView {
        title: "Emerging Leaders Quadrant",
        description: "Positioning by credibility and market traction",
        products,
        quadrants: Quadrant::ALL
            .iter()
            .map(|q| QuadrantLegend {
                quadrant: *q,
                legend: q.legend(),
            })
            .collect(),
    }))
}

#[derive(Serialize)]
struct CredibilityBadgeView {
    product_name: String,
    score: u8,
    badge: Badge,
    embed_code: String,
    svg_url: String,
}

async fn badge(
    State(state): State<AppState>,
    Path(product_id): Path<Id>,
) -> ApiResult<Json<CredibilityBadgeView>> {
    let product = state.product_or_404(product_id).await?;
    let (cred, _) = service::credibility_for(state.store.as_ref(), &product).await?;
    let base = state.config.public_base_url.trim_end_matches('/');
    Ok(Json(CredibilityBadgeView {
        product_name: product.details.name,
        score: cred.overall_score,
        badge: cred.badge,
        embed_code: format!("<div data-credibility-badge=\"{product_id}\"></div>"),
        svg_url: format!("{base}/api/v1/insights/{product_id}/badge/image"),
    }))
}

async fn badge_image(
    State(state): State<AppState>,
    Path(product_id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let product = state.product_or_404(product_id).await?;
    let (cred, _) = service::credibility_for(state.store.as_ref(), &product).await?;
    let svg = render_svg(
        &product.details.name,
        &format!("Credibility \u{b7} {}", cred.badge.tier.label()),
        cred.overall_score,
        &cred.badge.color,
    );
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg))
}
