use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AdminUser, AppState, CurrentUser};
use crate::domain::{Deal, DealStatus, Id, NewDeal, NewPilotRequest, PilotRequest};
use crate::error::{ApiError, ApiResult};
use crate::service;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/request", post(request_pilot))
        .route("/requests", get(list_requests))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Deal>>> {
    Ok(Json(state.store.list_deals().await?))
}

#[derive(Deserialize)]
struct DealCreate {
    product_id: Id,
    pilot_title: String,
    #[serde(default)]
    description: String,
    ideal_buyer: String,
    pilot_duration: String,
    #[serde(default)]
    status: DealStatus,
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<DealCreate>,
) -> ApiResult<(StatusCode, Json<Deal>)> {
    if body.pilot_title.trim().is_empty() {
        return Err(ApiError::BadRequest("pilot_title must not be empty".into()));
    }
    let product = state.product_or_404(body.product_id).await?;
    if product.owner_id != Some(user.id) {
        return Err(ApiError::Forbidden("Only the product owner can list a pilot".into()));
    }
    let (cred, _) = service::credibility_for(state.store.as_ref(), &product).await?;

    let deal = state
        .store
        .insert_deal(NewDeal {
            product_id: product.id,
            startup_name: product.details.name,
            pilot_title: body.pilot_title,
            description: body.description,
            ideal_buyer: body.ideal_buyer,
            credibility_score: cred.overall_score,
            pilot_duration: body.pilot_duration,
            status: body.status,
        })
        .await?;
    info!(
        deal_id = deal.id,
        product_id = deal.product_id,
        credibility = deal.credibility_score,
        "deal created"
    );
    Ok((StatusCode::CREATED, Json(deal)))
}

#[derive(Deserialize)]
struct PilotRequestIn {
    deal_id: Id,
    company_name: String,
    contact_email: String,
}

#[derive(Serialize)]
struct PilotRequestOut {
    success: bool,
    message: String,
    request: PilotRequest,
}

async fn request_pilot(
    State(state): State<AppState>,
    Json(body): Json<PilotRequestIn>,
) -> ApiResult<(StatusCode, Json<PilotRequestOut>)> {
    if body.company_name.trim().is_empty() {
        return Err(ApiError::BadRequest("company_name must not be empty".into()));
    }
    if !body.contact_email.contains('@') {
        return Err(ApiError::BadRequest("contact_email is not an email address".into()));
    }
    let deal = state
        .store
        .deal(body.deal_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Deal", body.deal_id))?;
    if deal.status == DealStatus::Closed {
        return Err(ApiError::BadRequest("Deal is closed".into()));
    }

    let request = state
        .store
        .insert_pilot_request(NewPilotRequest {
            deal_id: deal.id,
            company_name: body.company_name,
            contact_email: body.contact_email,
            startup_name: deal.startup_name.clone(),
        })
        .await?;
    info!(request_id = request.id, deal_id = deal.id, "pilot requested");

    Ok((
        StatusCode::CREATED,
        Json(PilotRequestOut {
            success: true,
            message: format!(
                "Pilot request submitted. {} will be in touch.",
                deal.startup_name
            ),
            request,
        }),
    ))
}

/// Contact details are exposed here, so admins only.
async fn list_requests(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> ApiResult<Json<Vec<PilotRequest>>> {
    Ok(Json(state.store.list_pilot_requests().await?))
}
