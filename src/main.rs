//! Startup credibility service. Binary entrypoint.
//! Boots the Axum HTTP server over an in-memory marketplace store.

use anyhow::Context;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use startup_credibility::{app, AppConfig};

/// Compact logs by default, JSON when `LOG_FORMAT=json`.
/// `try_init` leaves an already-installed subscriber (e.g. Shuttle's) in place.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("startup_credibility=info,tower_http=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = AppConfig::load_default().context("loading app config")?;
    tracing::info!(
        base_url = %config.public_base_url,
        initial_trust = config.initial_trust_score,
        "configuration loaded"
    );

    Ok(app(config).into())
}
