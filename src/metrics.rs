use axum::{routing::get, Router};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const REVIEWS_CREATED: &str = "reviews_created_total";
pub const UPVOTES_TOGGLED: &str = "upvotes_toggled_total";
pub const TRUST_REFRESHES: &str = "trust_refreshes_total";
pub const SENTIMENT_ANALYSES: &str = "sentiment_analyses_total";
pub const CREDIBILITY_SCORE: &str = "credibility_score";
pub const MODERATION_ACTIONS: &str = "moderation_actions_total";

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Safe to call repeatedly; the first
    /// successful install is reused for the life of the process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE.get_or_try_init(|| PrometheusBuilder::new().install_recorder())?;
        Ok(Self {
            handle: handle.clone(),
        })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

pub fn review_created() {
    counter!(REVIEWS_CREATED).increment(1);
}

pub fn upvote_toggled(added: bool) {
    let direction = if added { "add" } else { "remove" };
    counter!(UPVOTES_TOGGLED, "direction" => direction).increment(1);
}

pub fn trust_refreshed() {
    counter!(TRUST_REFRESHES).increment(1);
}

pub fn sentiment_analyzed() {
    counter!(SENTIMENT_ANALYSES).increment(1);
}

pub fn moderation_action(action: &'static str) {
    counter!(MODERATION_ACTIONS, "action" => action).increment(1);
}

pub fn credibility_observed(score: u8) {
    histogram!(CREDIBILITY_SCORE).record(f64::from(score));
}
