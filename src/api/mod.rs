//! HTTP surface. Every resource lives under `/api/v1`; `/health` and
//! `/metrics` sit at the root.

mod admin;
mod badges;
mod deals;
mod insights;
mod launches;
mod matchmaking;
mod products;
mod reviews;
mod scoring;
mod users;

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts, routing::get, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::domain::{Id, Product, User, UserRole};
use crate::error::{ApiError, ApiResult};
use crate::metrics::Metrics;
use crate::sentiment::SentimentAnalyzer;
use crate::store::MarketplaceRepository;

/// Header carrying the identity-provider user id.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketplaceRepository>,
    pub config: Arc<AppConfig>,
    pub analyzer: Arc<SentimentAnalyzer>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketplaceRepository>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            analyzer: Arc::new(SentimentAnalyzer::new()),
        }
    }

    pub(crate) async fn product_or_404(&self, id: Id) -> ApiResult<Product> {
        self.store
            .product(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product", id))
    }
}

pub fn router(state: AppState) -> Router {
    let cors = if state.config.cors_permissive {
        CorsLayer::very_permissive()
    } else {
        CorsLayer::new()
    };

    let api = Router::new()
        .nest("/users", users::routes())
        .nest("/products", products::routes())
        .nest("/reviews", reviews::routes())
        .nest("/launches", launches::routes())
        .nest("/insights", insights::routes())
        .nest("/matchmaking", matchmaking::routes())
        .nest("/badges", badges::routes())
        .nest("/deals", deals::routes())
        .nest("/scoring", scoring::routes())
        .nest("/admin", admin::routes());

    let mut app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1", api)
        .with_state(state);

    match Metrics::init() {
        Ok(m) => app = app.merge(m.router()),
        Err(e) => tracing::warn!(error = %e, "prometheus recorder unavailable; /metrics disabled"),
    }

    app.layer(TraceLayer::new_for_http()).layer(cors)
}

/// Raw identity-provider id from the request header. 401 when absent.
pub struct ExternalUserId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ExternalUserId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_user_id(parts)
            .map(ExternalUserId)
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {USER_ID_HEADER} header")))
    }
}

/// Resolved caller. 401 without the header, 404 when the id is unknown.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ExternalUserId(external_id) = ExternalUserId::from_request_parts(parts, state).await?;
        state
            .store
            .user_by_external_id(&external_id)
            .await?
            .map(CurrentUser)
            .ok_or_else(|| ApiError::not_found("User", external_id))
    }
}

/// Resolved caller holding the admin role. 403 for any other role.
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            return Err(ApiError::Forbidden("Admin access required".into()));
        }
        Ok(AdminUser(user))
    }
}

/// Caller if identified and known; anonymous otherwise.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(external_id) = header_user_id(parts) else {
            return Ok(MaybeUser(None));
        };
        Ok(MaybeUser(state.store.user_by_external_id(&external_id).await?))
    }
}

fn header_user_id(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Compact product reference embedded in several responses.
#[derive(Debug, Serialize)]
pub(crate) struct ProductRef {
    pub id: Id,
    pub name: String,
    pub category: String,
    pub funding_stage: String,
}

impl From<&Product> for ProductRef {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.details.name.clone(),
            category: p.details.category.clone(),
            funding_stage: p.details.funding_stage.clone(),
        }
    }
}
