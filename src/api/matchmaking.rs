use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::{AppState, ProductRef};
use crate::analyze::matchmaking::MATCH_FACTORS;
use crate::analyze::{match_buyers, BuyerMatch};
use crate::domain::Id;
use crate::error::ApiResult;

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/{product_id}", get(for_product))
}

#[derive(Serialize)]
struct MatchmakingView {
    startup: ProductRef,
    trust_score: u8,
    market_traction: u8,
    factors: [&'static str; 3],
    recommended_buyers: Vec<BuyerMatch>,
    total_matches: usize,
}

async fn for_product(
    State(state): State<AppState>,
    Path(product_id): Path<Id>,
) -> ApiResult<Json<MatchmakingView>> {
    let p = state.product_or_404(product_id).await?;
    let traction = p.current.market_traction;
    let matches = match_buyers(&p.details.category, p.trust_score, traction);
    Ok(Json(MatchmakingView {
        startup: ProductRef::from(&p),
        trust_score: p.trust_score,
        market_traction: traction,
        factors: MATCH_FACTORS,
        total_matches: matches.len(),
        recommended_buyers: matches,
    }))
}
