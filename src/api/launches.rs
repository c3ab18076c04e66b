use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AppState, CurrentUser, MaybeUser};
use crate::domain::{Id, Launch};
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::service;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/leaderboard", get(leaderboard))
        .route("/{id}/upvote", post(toggle_upvote))
        .route("/{id}/upvote-status", get(upvote_status))
}

#[derive(Deserialize)]
struct LaunchCreate {
    product_id: Id,
    #[serde(default)]
    tagline: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<LaunchCreate>,
) -> ApiResult<(StatusCode, Json<Launch>)> {
    state.product_or_404(body.product_id).await?;
    let launch = state.store.insert_launch(body.product_id, body.tagline).await?;
    info!(launch_id = launch.id, product_id = launch.product_id, user_id = user.id, "launch created");
    Ok((StatusCode::CREATED, Json(launch)))
}

#[derive(Serialize)]
struct UpvoteOut {
    id: Id,
    upvotes: u32,
    user_upvoted: bool,
    trust_score: Option<u8>,
}

async fn toggle_upvote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(launch_id): Path<Id>,
) -> ApiResult<Json<UpvoteOut>> {
    let toggled = state
        .store
        .toggle_upvote(launch_id, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Launch", launch_id))?;
    metrics::upvote_toggled(toggled.user_upvoted);
    info!(
        launch_id,
        user_id = user.id,
        added = toggled.user_upvoted,
        upvotes = toggled.launch.upvotes,
        "upvote toggled"
    );

    let trust_score = service::refresh_trust_score(state.store.as_ref(), toggled.launch.product_id)
        .await?
        .map(|(p, _)| p.trust_score);

    Ok(Json(UpvoteOut {
        id: launch_id,
        upvotes: toggled.launch.upvotes,
        user_upvoted: toggled.user_upvoted,
        trust_score,
    }))
}

#[derive(Serialize)]
struct UpvoteStatus {
    user_upvoted: bool,
}

async fn upvote_status(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(launch_id): Path<Id>,
) -> ApiResult<Json<UpvoteStatus>> {
    state
        .store
        .launch(launch_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Launch", launch_id))?;
    let user_upvoted = match user {
        Some(u) => state.store.has_upvoted(launch_id, u.id).await?,
        None => false,
    };
    Ok(Json(UpvoteStatus { user_upvoted }))
}

#[derive(Serialize)]
struct LeaderboardEntry {
    id: Id,
    product_id: Id,
    product_name: String,
    category: String,
    tagline: Option<String>,
    upvotes: u32,
    rank: usize,
    is_featured: bool,
    user_upvoted: bool,
}

async fn leaderboard(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let upvoted: HashSet<Id> = match &user {
        Some(u) => state.store.upvoted_launches(u.id).await?.into_iter().collect(),
        None => HashSet::new(),
    };
    let products: HashMap<Id, _> = state
        .store
        .list_products()
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let entries = state
        .store
        .list_launches()
        .await?
        .into_iter()
        .filter_map(|l| {
            let p = products.get(&l.product_id)?;
            Some((l, p.details.name.clone(), p.details.category.clone()))
        })
        .enumerate()
        .map(|(i, (l, product_name, category))| LeaderboardEntry {
            id: l.id,
            product_id: l.product_id,
            product_name,
            category,
            tagline: l.tagline,
            upvotes: l.upvotes,
            rank: i + 1,
            is_featured: l.is_featured,
            user_upvoted: upvoted.contains(&l.id),
        })
        .collect();
    Ok(Json(entries))
}
