// src/lib.rs
// Public library surface for the binary, integration tests, and reuse.

pub mod api;
pub mod badge;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod sentiment;
pub mod service;
pub mod signals;
pub mod store;

// Composition pipeline (weights, scoring, rules, credibility, quadrant, matchmaking)
pub mod analyze;

use std::sync::Arc;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{
    compose_credibility, compose_dynamic_trust, compose_trust_score, match_buyers,
    position_quadrant,
};
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::sentiment::analyze_sentiment;
pub use crate::signals::{
    normalize_data_integrity, normalize_market_traction, normalize_user_sentiment, SignalInputs,
    SubScores,
};
pub use crate::store::{InMemoryStore, MarketplaceRepository};

/// Full in-process application over a fresh in-memory store.
pub fn app(config: AppConfig) -> axum::Router {
    let store: Arc<dyn MarketplaceRepository> = Arc::new(InMemoryStore::new());
    router(AppState::new(store, config))
}
