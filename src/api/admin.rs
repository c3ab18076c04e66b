//! Moderation endpoints. Every route requires the admin role.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AdminUser, AppState};
use crate::domain::{Id, Product, ProductStatus, Review, User};
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::service;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/products", get(products))
        .route("/products/{id}", delete(delete_product))
        .route("/products/{id}/approve", post(approve))
        .route("/products/{id}/reject", post(reject))
        .route("/users", get(users))
        .route("/reviews", get(reviews))
        .route("/reviews/{id}", delete(delete_review))
        .route("/reviews/{id}/verify", post(verify_review))
}

/// Acknowledgement shared by every moderation action.
#[derive(Serialize)]
struct Moderated<T: Serialize> {
    success: bool,
    message: String,
    /// Email of the acting admin.
    admin: String,
    #[serde(flatten)]
    detail: T,
}

impl<T: Serialize> Moderated<T> {
    fn new(admin: &User, message: String, detail: T) -> Json<Self> {
        Json(Self {
            success: true,
            message,
            admin: admin.email.clone(),
            detail,
        })
    }
}

#[derive(Serialize)]
struct AdminStats {
    total_products: usize,
    total_users: usize,
    total_reviews: usize,
    total_upvotes: u64,
    pending_products: usize,
}

async fn stats(State(state): State<AppState>, AdminUser(_): AdminUser) -> ApiResult<Json<AdminStats>> {
    let products = state.store.list_products().await?;
    Ok(Json(AdminStats {
        total_products: products.len(),
        total_users: state.store.list_users().await?.len(),
        total_reviews: state.store.list_reviews().await?.len(),
        total_upvotes: state
            .store
            .list_launches()
            .await?
            .iter()
            .map(|l| u64::from(l.upvotes))
            .sum(),
        pending_products: products
            .iter()
            .filter(|p| p.status == ProductStatus::Pending)
            .count(),
    }))
}

#[derive(Deserialize)]
struct ProductFilter {
    status: Option<ProductStatus>,
}

/// Newest first, optionally narrowed to one moderation state.
async fn products(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Vec<Product>>> {
    let mut rows = state.store.list_products().await?;
    rows.retain(|p| filter.status.map_or(true, |s| p.status == s));
    rows.reverse();
    Ok(Json(rows))
}

#[derive(Serialize)]
struct StatusChanged {
    product: Product,
}

async fn set_status(
    state: &AppState,
    admin: &User,
    id: Id,
    status: ProductStatus,
    action: &'static str,
) -> ApiResult<Json<Moderated<StatusChanged>>> {
    let product = state
        .store
        .set_product_status(id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    metrics::moderation_action(action);
    info!(product_id = id, admin_id = admin.id, status = ?status, "product moderated");
    Ok(Moderated::new(
        admin,
        format!("Product {id} {action}"),
        StatusChanged { product },
    ))
}

async fn approve(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Id>,
) -> ApiResult<Json<Moderated<StatusChanged>>> {
    set_status(&state, &admin, id, ProductStatus::Approved, "approved").await
}

async fn reject(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Id>,
) -> ApiResult<Json<Moderated<StatusChanged>>> {
    set_status(&state, &admin, id, ProductStatus::Rejected, "rejected").await
}

#[derive(Serialize)]
struct ProductDeleted {
    removed_reviews: usize,
    removed_launches: usize,
    removed_deals: usize,
}

async fn delete_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Id>,
) -> ApiResult<Json<Moderated<ProductDeleted>>> {
    let removed = state
        .store
        .delete_product(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    metrics::moderation_action("product_deleted");
    info!(
        product_id = id,
        admin_id = admin.id,
        reviews = removed.reviews,
        launches = removed.launches,
        deals = removed.deals,
        "product deleted"
    );
    Ok(Moderated::new(
        &admin,
        format!("Product {id} deleted"),
        ProductDeleted {
            removed_reviews: removed.reviews,
            removed_launches: removed.launches,
            removed_deals: removed.deals,
        },
    ))
}

async fn users(State(state): State<AppState>, AdminUser(_): AdminUser) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.store.list_users().await?))
}

async fn reviews(State(state): State<AppState>, AdminUser(_): AdminUser) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(state.store.list_reviews().await?))
}

#[derive(Serialize)]
struct ReviewRemoved {
    review_id: Id,
    trust_score: Option<u8>,
}

async fn delete_review(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Id>,
) -> ApiResult<Json<Moderated<ReviewRemoved>>> {
    let review = state
        .store
        .delete_review(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review", id))?;
    metrics::moderation_action("review_deleted");
    info!(review_id = id, product_id = review.product_id, admin_id = admin.id, "review removed by admin");

    let trust_score = service::refresh_trust_score(state.store.as_ref(), review.product_id)
        .await?
        .map(|(p, _)| p.trust_score);

    Ok(Moderated::new(
        &admin,
        format!("Review {id} deleted"),
        ReviewRemoved {
            review_id: id,
            trust_score,
        },
    ))
}

#[derive(Serialize)]
struct ReviewVerified {
    review: Review,
}

async fn verify_review(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Id>,
) -> ApiResult<Json<Moderated<ReviewVerified>>> {
    let review = state
        .store
        .verify_review(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review", id))?;
    metrics::moderation_action("review_verified");
    info!(review_id = id, admin_id = admin.id, "review verified");
    Ok(Moderated::new(
        &admin,
        format!("Review {id} verified"),
        ReviewVerified { review },
    ))
}
