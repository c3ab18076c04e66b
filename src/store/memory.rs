//! Process-local `MarketplaceRepository` for tests and single-node runs.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{
    MarketplaceRepository, ProductRemoval, ScoreRecompute, ScoreRefresh, StoreResult, UpvoteToggle,
};
use crate::domain::{
    Deal, Id, Launch, NewDeal, NewPilotRequest, NewProduct, NewReview, PilotRequest, PilotStatus,
    Product, ProductAggregates, ProductDetails, ProductStatus, Review, User, UserRole, UserSync,
    UserUpdate,
};

#[derive(Debug, Default)]
struct Tables {
    next_id: Id,
    users: BTreeMap<Id, User>,
    products: BTreeMap<Id, Product>,
    reviews: BTreeMap<Id, Review>,
    launches: BTreeMap<Id, Launch>,
    upvotes: HashSet<(Id, Id)>, // (launch_id, user_id)
    deals: BTreeMap<Id, Deal>,
    pilot_requests: BTreeMap<Id, PilotRequest>,
}

impl Tables {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn aggregates(&self, product_id: Id) -> ProductAggregates {
        ProductAggregates {
            total_upvotes: self
                .launches
                .values()
                .filter(|l| l.product_id == product_id)
                .map(|l| u64::from(l.upvotes))
                .sum(),
            reviews: self
                .reviews
                .values()
                .filter(|r| r.product_id == product_id)
                .collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketplaceRepository for InMemoryStore {
    async fn sync_user(&self, sync: UserSync) -> StoreResult<User> {
        let mut t = self.inner.write();
        if let Some(existing) = t.users.values_mut().find(|u| u.external_id == sync.external_id) {
            existing.email = sync.email;
            existing.full_name = sync.full_name;
            existing.avatar_url = sync.avatar_url;
            return Ok(existing.clone());
        }
        let id = t.next_id();
        let user = User {
            id,
            external_id: sync.external_id,
            email: sync.email,
            full_name: sync.full_name,
            avatar_url: sync.avatar_url,
            role: sync.role,
            company_name: sync.company_name,
        };
        t.users.insert(id, user.clone());
        Ok(user)
    }

    async fn user_by_external_id(&self, external_id: &str) -> StoreResult<Option<User>> {
        let t = self.inner.read();
        Ok(t.users.values().find(|u| u.external_id == external_id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.read().users.values().rev().cloned().collect())
    }

    async fn update_user(&self, external_id: &str, update: UserUpdate) -> StoreResult<Option<User>> {
        let mut t = self.inner.write();
        let Some(user) = t.users.values_mut().find(|u| u.external_id == external_id) else {
            return Ok(None);
        };
        if let Some(name) = update.full_name {
            user.full_name = Some(name);
        }
        if let Some(company) = update.company_name {
            user.company_name = Some(company);
        }
        Ok(Some(user.clone()))
    }

    async fn set_user_role(&self, id: Id, role: UserRole) -> StoreResult<Option<User>> {
        let mut t = self.inner.write();
        Ok(t.users.get_mut(&id).map(|u| {
            u.role = role;
            u.clone()
        }))
    }

    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
        let mut t = self.inner.write();
        let id = t.next_id();
        let row = Product {
            id,
            details: product.details,
            owner_id: product.owner_id,
            status: ProductStatus::default(),
            baseline: product.baseline,
            current: product.baseline,
            trust_score: product.trust_score,
            created_at: Utc::now(),
        };
        t.products.insert(id, row.clone());
        Ok(row)
    }

    async fn product(&self, id: Id) -> StoreResult<Option<Product>> {
        Ok(self.inner.read().products.get(&id).cloned())
    }

    async fn product_aggregates(&self, id: Id) -> StoreResult<ProductAggregates> {
        Ok(self.inner.read().aggregates(id))
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.inner.read().products.values().cloned().collect())
    }

    async fn products_by_owner(&self, owner_id: Id) -> StoreResult<Vec<Product>> {
        let t = self.inner.read();
        Ok(t.products
            .values()
            .filter(|p| p.owner_id == Some(owner_id))
            .cloned()
            .collect())
    }

    async fn update_product_details(
        &self,
        id: Id,
        details: ProductDetails,
    ) -> StoreResult<Option<Product>> {
        let mut t = self.inner.write();
        Ok(t.products.get_mut(&id).map(|p| {
            p.details = details;
            p.clone()
        }))
    }

    async fn refresh_product_scores(
        &self,
        id: Id,
        recompute: &ScoreRecompute,
    ) -> StoreResult<Option<ScoreRefresh>> {
        let mut t = self.inner.write();
        let aggregates = t.aggregates(id);
        let Some(p) = t.products.get_mut(&id) else {
            return Ok(None);
        };
        let previous_trust = p.trust_score;
        let (current, trust_score) = recompute(p.baseline, &aggregates);
        p.current = current;
        p.trust_score = trust_score.min(100);
        Ok(Some(ScoreRefresh {
            product: p.clone(),
            previous_trust,
            aggregates,
        }))
    }

    async fn set_product_status(&self, id: Id, status: ProductStatus) -> StoreResult<Option<Product>> {
        let mut t = self.inner.write();
        Ok(t.products.get_mut(&id).map(|p| {
            p.status = status;
            p.clone()
        }))
    }

    async fn delete_product(&self, id: Id) -> StoreResult<Option<ProductRemoval>> {
        let mut t = self.inner.write();
        let Some(product) = t.products.remove(&id) else {
            return Ok(None);
        };

        let reviews_before = t.reviews.len();
        t.reviews.retain(|_, r| r.product_id != id);

        let launch_ids: HashSet<Id> = t
            .launches
            .values()
            .filter(|l| l.product_id == id)
            .map(|l| l.id)
            .collect();
        t.launches.retain(|lid, _| !launch_ids.contains(lid));
        t.upvotes.retain(|(lid, _)| !launch_ids.contains(lid));

        let deal_ids: HashSet<Id> = t
            .deals
            .values()
            .filter(|d| d.product_id == id)
            .map(|d| d.id)
            .collect();
        t.deals.retain(|did, _| !deal_ids.contains(did));
        t.pilot_requests.retain(|_, r| !deal_ids.contains(&r.deal_id));

        Ok(Some(ProductRemoval {
            product,
            reviews: reviews_before - t.reviews.len(),
            launches: launch_ids.len(),
            deals: deal_ids.len(),
        }))
    }

    async fn insert_review(&self, review: NewReview) -> StoreResult<Review> {
        let mut t = self.inner.write();
        let id = t.next_id();
        let row = Review {
            id,
            product_id: review.product_id,
            author_id: review.author_id,
            reviewer_name: review.reviewer_name,
            rating: review.rating,
            comment: review.comment,
            sentiment_score: review.sentiment_score,
            verified: false,
            created_at: Utc::now(),
        };
        t.reviews.insert(id, row.clone());
        Ok(row)
    }

    async fn review(&self, id: Id) -> StoreResult<Option<Review>> {
        Ok(self.inner.read().reviews.get(&id).cloned())
    }

    async fn reviews_for_product(&self, product_id: Id) -> StoreResult<Vec<Review>> {
        let t = self.inner.read();
        // Ids grow monotonically, so reverse id order is newest first.
        Ok(t.reviews
            .values()
            .rev()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.inner.read().reviews.values().rev().cloned().collect())
    }

    async fn delete_review(&self, id: Id) -> StoreResult<Option<Review>> {
        Ok(self.inner.write().reviews.remove(&id))
    }

    async fn verify_review(&self, id: Id) -> StoreResult<Option<Review>> {
        let mut t = self.inner.write();
        Ok(t.reviews.get_mut(&id).map(|r| {
            r.verified = true;
            r.clone()
        }))
    }

    async fn insert_launch(&self, product_id: Id, tagline: Option<String>) -> StoreResult<Launch> {
        let mut t = self.inner.write();
        let id = t.next_id();
        let row = Launch {
            id,
            product_id,
            tagline,
            upvotes: 0,
            rank: 0,
            is_featured: false,
            created_at: Utc::now(),
        };
        t.launches.insert(id, row.clone());
        Ok(row)
    }

    async fn launch(&self, id: Id) -> StoreResult<Option<Launch>> {
        Ok(self.inner.read().launches.get(&id).cloned())
    }

    async fn list_launches(&self) -> StoreResult<Vec<Launch>> {
        let mut all: Vec<Launch> = self.inner.read().launches.values().cloned().collect();
        all.sort_by(|a, b| b.upvotes.cmp(&a.upvotes));
        Ok(all)
    }

    async fn toggle_upvote(&self, launch_id: Id, user_id: Id) -> StoreResult<Option<UpvoteToggle>> {
        let mut t = self.inner.write();
        if !t.launches.contains_key(&launch_id) {
            return Ok(None);
        }
        let key = (launch_id, user_id);
        let user_upvoted = if t.upvotes.remove(&key) {
            false
        } else {
            t.upvotes.insert(key);
            true
        };
        let Some(launch) = t.launches.get_mut(&launch_id) else {
            return Ok(None);
        };
        launch.upvotes = if user_upvoted {
            launch.upvotes.saturating_add(1)
        } else {
            launch.upvotes.saturating_sub(1)
        };
        Ok(Some(UpvoteToggle {
            launch: launch.clone(),
            user_upvoted,
        }))
    }

    async fn has_upvoted(&self, launch_id: Id, user_id: Id) -> StoreResult<bool> {
        Ok(self.inner.read().upvotes.contains(&(launch_id, user_id)))
    }

    async fn upvoted_launches(&self, user_id: Id) -> StoreResult<Vec<Id>> {
        let t = self.inner.read();
        let mut ids: Vec<Id> = t
            .upvotes
            .iter()
            .filter(|(_, u)| *u == user_id)
            .map(|(l, _)| *l)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn insert_deal(&self, deal: NewDeal) -> StoreResult<Deal> {
        let mut t = self.inner.write();
        let id = t.next_id();
        let row = Deal {
            id,
            product_id: deal.product_id,
            startup_name: deal.startup_name,
            pilot_title: deal.pilot_title,
            description: deal.description,
            ideal_buyer: deal.ideal_buyer,
            credibility_score: deal.credibility_score,
            pilot_duration: deal.pilot_duration,
            status: deal.status,
        };
        t.deals.insert(id, row.clone());
        Ok(row)
    }

    async fn deal(&self, id: Id) -> StoreResult<Option<Deal>> {
        Ok(self.inner.read().deals.get(&id).cloned())
    }

    async fn list_deals(&self) -> StoreResult<Vec<Deal>> {
        Ok(self.inner.read().deals.values().cloned().collect())
    }

    async fn insert_pilot_request(&self, request: NewPilotRequest) -> StoreResult<PilotRequest> {
        let mut t = self.inner.write();
        let id = t.next_id();
        let row = PilotRequest {
            id,
            deal_id: request.deal_id,
            company_name: request.company_name,
            contact_email: request.contact_email,
            startup_name: request.startup_name,
            status: PilotStatus::Pending,
            created_at: Utc::now(),
        };
        t.pilot_requests.insert(id, row.clone());
        Ok(row)
    }

    async fn list_pilot_requests(&self) -> StoreResult<Vec<PilotRequest>> {
        Ok(self.inner.read().pilot_requests.values().cloned().collect())
    }
}
