//! # Marketplace repository
//! Data-access interface the HTTP layer talks to. The scoring core never sees
//! it; handlers fetch aggregates through it and persist refreshed scores.
//!
//! `InMemoryStore` is the bundled implementation. A managed datastore plugs in
//! by implementing the same trait.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    Deal, Id, Launch, NewDeal, NewPilotRequest, NewProduct, NewReview, PilotRequest, Product,
    ProductAggregates, ProductDetails, ProductStatus, Review, User, UserRole, UserSync, UserUpdate,
};
use crate::signals::SubScores;

pub use memory::InMemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("datastore unavailable: {0}")]
    Unavailable(String),

    #[error("datastore rejected the write: {0}")]
    Rejected(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of toggling a user's upvote on a launch.
#[derive(Debug, Clone, PartialEq)]
pub struct UpvoteToggle {
    pub launch: Launch,
    pub user_upvoted: bool,
}

/// Maps a product's baseline sub-scores and live activity to the refreshed
/// sub-scores and trust score.
pub type ScoreRecompute = dyn Fn(SubScores, &ProductAggregates) -> (SubScores, u8) + Send + Sync;

/// Outcome of [`MarketplaceRepository::refresh_product_scores`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRefresh {
    pub product: Product,
    pub previous_trust: u8,
    /// The activity the new scores were computed from.
    pub aggregates: ProductAggregates,
}

/// Everything removed along with a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRemoval {
    pub product: Product,
    pub reviews: usize,
    pub launches: usize,
    pub deals: usize,
}

#[async_trait]
pub trait MarketplaceRepository: Send + Sync {
    // --- users ---
    /// Insert on first sight, otherwise refresh profile fields (role is kept).
    async fn sync_user(&self, sync: UserSync) -> StoreResult<User>;
    async fn user_by_external_id(&self, external_id: &str) -> StoreResult<Option<User>>;
    /// Newest first.
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn update_user(&self, external_id: &str, update: UserUpdate) -> StoreResult<Option<User>>;
    async fn set_user_role(&self, id: Id, role: UserRole) -> StoreResult<Option<User>>;

    // --- products ---
    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product>;
    async fn product(&self, id: Id) -> StoreResult<Option<Product>>;
    /// Upvotes and review roll-up read as one consistent snapshot.
    async fn product_aggregates(&self, id: Id) -> StoreResult<ProductAggregates>;
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn products_by_owner(&self, owner_id: Id) -> StoreResult<Vec<Product>>;
    async fn update_product_details(
        &self,
        id: Id,
        details: ProductDetails,
    ) -> StoreResult<Option<Product>>;
    /// Read the product's aggregates and write `recompute`'s result without
    /// letting another mutation in between. `None` if the product is gone.
    async fn refresh_product_scores(
        &self,
        id: Id,
        recompute: &ScoreRecompute,
    ) -> StoreResult<Option<ScoreRefresh>>;
    async fn set_product_status(&self, id: Id, status: ProductStatus) -> StoreResult<Option<Product>>;
    /// Removes the product with its reviews, launches, upvotes, deals and pilot requests.
    async fn delete_product(&self, id: Id) -> StoreResult<Option<ProductRemoval>>;

    // --- reviews ---
    async fn insert_review(&self, review: NewReview) -> StoreResult<Review>;
    async fn review(&self, id: Id) -> StoreResult<Option<Review>>;
    /// Newest first.
    async fn reviews_for_product(&self, product_id: Id) -> StoreResult<Vec<Review>>;
    /// Every review, newest first.
    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;
    async fn delete_review(&self, id: Id) -> StoreResult<Option<Review>>;
    async fn verify_review(&self, id: Id) -> StoreResult<Option<Review>>;

    // --- launches ---
    async fn insert_launch(&self, product_id: Id, tagline: Option<String>) -> StoreResult<Launch>;
    async fn launch(&self, id: Id) -> StoreResult<Option<Launch>>;
    /// Sorted by upvotes, most first.
    async fn list_launches(&self) -> StoreResult<Vec<Launch>>;
    /// Add the user's upvote if absent, remove it if present. Atomic per launch.
    async fn toggle_upvote(&self, launch_id: Id, user_id: Id) -> StoreResult<Option<UpvoteToggle>>;
    async fn has_upvoted(&self, launch_id: Id, user_id: Id) -> StoreResult<bool>;
    async fn upvoted_launches(&self, user_id: Id) -> StoreResult<Vec<Id>>;

    // --- deals ---
    async fn insert_deal(&self, deal: NewDeal) -> StoreResult<Deal>;
    async fn deal(&self, id: Id) -> StoreResult<Option<Deal>>;
    async fn list_deals(&self) -> StoreResult<Vec<Deal>>;
    async fn insert_pilot_request(&self, request: NewPilotRequest) -> StoreResult<PilotRequest>;
    async fn list_pilot_requests(&self) -> StoreResult<Vec<PilotRequest>>;
}
