//! Caller-side orchestration between the repository and the scoring core.
//!
//! Handlers that mutate reviews or upvotes must call [`refresh_trust_score`]
//! before responding so the stored trust score never lags the aggregates. The
//! refresh reads and writes inside one store section, so the last refresh to
//! run always reflects every mutation before it.

use tracing::{debug, info};

use crate::analyze::{
    compose_credibility, compose_dynamic_trust, trust_from_sub_scores, CredibilityResult,
    DynamicTrust,
};
use crate::config::AppConfig;
use crate::domain::{Id, NewProduct, Product, ProductSubmission};
use crate::metrics;
use crate::signals::SubScores;
use crate::store::{MarketplaceRepository, StoreResult};

pub use crate::domain::ProductAggregates;

/// Baseline sub-scores and trust for a new product.
pub fn initial_scores(config: &AppConfig, submission: &ProductSubmission) -> (SubScores, u8) {
    match &submission.signals {
        Some(signals) => {
            let baseline = SubScores::from_signals(signals);
            (baseline, trust_from_sub_scores(&baseline))
        }
        None => (
            SubScores::uniform(config.initial_sub_score),
            config.initial_trust_score.min(100),
        ),
    }
}

pub async fn create_product(
    store: &dyn MarketplaceRepository,
    config: &AppConfig,
    submission: ProductSubmission,
    owner_id: Option<Id>,
) -> StoreResult<Product> {
    let (baseline, trust_score) = initial_scores(config, &submission);
    let product = store
        .insert_product(NewProduct {
            details: submission.details,
            owner_id,
            baseline,
            trust_score,
        })
        .await?;
    info!(
        product_id = product.id,
        category = %product.details.category,
        trust_score,
        from_signals = submission.signals.is_some(),
        "product created"
    );
    Ok(product)
}

/// Recompute and persist the dynamic trust score. `None` if the product is gone.
pub async fn refresh_trust_score(
    store: &dyn MarketplaceRepository,
    product_id: Id,
) -> StoreResult<Option<(Product, DynamicTrust)>> {
    let recompute = |baseline: SubScores, agg: &ProductAggregates| {
        let t = compose_dynamic_trust(baseline, &agg.reviews, agg.total_upvotes);
        (t.sub_scores(), t.score)
    };
    let Some(refresh) = store.refresh_product_scores(product_id, &recompute).await? else {
        return Ok(None);
    };
    let agg = refresh.aggregates;
    let trust = compose_dynamic_trust(refresh.product.baseline, &agg.reviews, agg.total_upvotes);

    metrics::trust_refreshed();
    if refresh.product.trust_score != refresh.previous_trust {
        info!(
            product_id,
            old = refresh.previous_trust,
            new = refresh.product.trust_score,
            reviews = agg.reviews.count,
            upvotes = agg.total_upvotes,
            "trust score refreshed"
        );
    } else {
        debug!(product_id, score = refresh.product.trust_score, "trust score unchanged");
    }
    Ok(Some((refresh.product, trust)))
}

/// Credibility from the product's stored trust score and live aggregates.
pub async fn credibility_for(
    store: &dyn MarketplaceRepository,
    product: &Product,
) -> StoreResult<(CredibilityResult, ProductAggregates)> {
    let agg = store.product_aggregates(product.id).await?;
    let result = compose_credibility(
        i64::try_from(agg.total_upvotes).unwrap_or(i64::MAX),
        i64::try_from(agg.reviews.count).unwrap_or(i64::MAX),
        agg.reviews.average_rating,
        i64::from(product.trust_score),
        &product.details.funding_stage,
    );
    metrics::credibility_observed(result.overall_score);
    Ok((result, agg))
}
