// service/negotiation_service.rs
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::Repository,
    models::{
        listingmodel::MAX_MONTHLY_RENT,
        negotiationmodel::{Negotiation, NegotiationAction, NegotiationStatus},
    },
    service::error::ServiceError,
};

pub const MAX_DURATION_MONTHS: i32 = 60;

/// Outcome of a tenant accepting the owner's counter offer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedCounter {
    pub negotiation: Negotiation,
    pub can_book: bool,
    pub final_price: i64,
    pub savings: i64,
}

#[derive(Debug, Clone)]
pub struct NegotiationService {
    repo: Arc<dyn Repository>,
    ttl: Duration,
}

impl NegotiationService {
    pub fn new(repo: Arc<dyn Repository>, ttl_hours: i64) -> Self {
        Self {
            repo,
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Tenant opens a negotiation on a listing at `proposed_price`.
    pub async fn propose(
        &self,
        listing_id: Uuid,
        tenant_id: Uuid,
        proposed_price: i64,
        duration: i32,
        message: Option<String>,
    ) -> Result<Negotiation, ServiceError> {
        if proposed_price <= 0 {
            return Err(ServiceError::Validation(
                "Proposed price must be greater than zero".to_string(),
            ));
        }
        if proposed_price > MAX_MONTHLY_RENT {
            return Err(ServiceError::Validation(format!(
                "Proposed price cannot exceed {}",
                MAX_MONTHLY_RENT
            )));
        }
        if !(1..=MAX_DURATION_MONTHS).contains(&duration) {
            return Err(ServiceError::Validation(format!(
                "Duration must be between 1 and {} months",
                MAX_DURATION_MONTHS
            )));
        }

        let listing = self
            .repo
            .get_listing(listing_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Listing", listing_id))?;

        if listing.is_owned_by(tenant_id) {
            return Err(ServiceError::Permission(
                "You cannot negotiate on your own listing".to_string(),
            ));
        }

        let now = Utc::now();
        let negotiation = Negotiation {
            id: Uuid::new_v4(),
            listing_id: listing.id,
            tenant_id,
            owner_id: listing.owner_id,
            original_price: listing.price,
            proposed_price,
            counter_offer: None,
            final_price: None,
            duration,
            message,
            owner_message: None,
            status: NegotiationStatus::Proposed,
            created_at: now,
            expires_at: Some(now + self.ttl),
            response_date: None,
            updated_at: now,
        };

        let saved = self.repo.save_negotiation(&negotiation).await?;
        tracing::info!(
            negotiation_id = %saved.id,
            listing_id = %saved.listing_id,
            proposed_price = saved.proposed_price,
            original_price = saved.original_price,
            "negotiation proposed"
        );

        Ok(saved)
    }

    pub async fn counter(
        &self,
        negotiation_id: Uuid,
        owner_id: Uuid,
        counter_offer: i64,
        message: Option<String>,
    ) -> Result<Negotiation, ServiceError> {
        self.act(
            negotiation_id,
            owner_id,
            NegotiationAction::Counter {
                offer: counter_offer,
                message,
            },
        )
        .await
    }

    pub async fn accept_counter(
        &self,
        negotiation_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<AcceptedCounter, ServiceError> {
        let negotiation = self
            .act(negotiation_id, tenant_id, NegotiationAction::AcceptCounter)
            .await?;

        let (final_price, savings) = match (negotiation.final_price, negotiation.savings()) {
            (Some(final_price), Some(savings)) => (final_price, savings),
            _ => {
                return Err(ServiceError::State(
                    "Accepted negotiation has no final price".to_string(),
                ))
            }
        };

        Ok(AcceptedCounter {
            negotiation,
            can_book: true,
            final_price,
            savings,
        })
    }

    pub async fn reject(
        &self,
        negotiation_id: Uuid,
        actor_id: Uuid,
        message: Option<String>,
    ) -> Result<Negotiation, ServiceError> {
        self.act(negotiation_id, actor_id, NegotiationAction::Reject { message })
            .await
    }

    /// A negotiation as seen by one of its parties.
    pub async fn get(&self, negotiation_id: Uuid, actor_id: Uuid) -> Result<Negotiation, ServiceError> {
        let negotiation = self.load(negotiation_id).await?;
        if negotiation.party_of(actor_id).is_none() {
            return Err(ServiceError::Permission(
                "You are not a party to this negotiation".to_string(),
            ));
        }
        Ok(self.refresh(negotiation).await)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Negotiation>, ServiceError> {
        let negotiations = self.repo.get_negotiations_for_user(user_id).await?;

        let mut refreshed = Vec::with_capacity(negotiations.len());
        for negotiation in negotiations {
            refreshed.push(self.refresh(negotiation).await);
        }
        Ok(refreshed)
    }

    async fn load(&self, negotiation_id: Uuid) -> Result<Negotiation, ServiceError> {
        self.repo
            .get_negotiation(negotiation_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Negotiation", negotiation_id))
    }

    /// Read path: applies lazy expiry. A failed write-back is logged and the
    /// caller still sees the expired status.
    async fn refresh(&self, mut negotiation: Negotiation) -> Negotiation {
        if negotiation.expire_if_due(Utc::now()) {
            match self.repo.update_negotiation(&negotiation).await {
                Ok(stored) => return stored,
                Err(e) => tracing::warn!(
                    negotiation_id = %negotiation.id,
                    "could not persist lazy expiry: {}", e
                ),
            }
        }
        negotiation
    }

    /// Write path: expire if due (persisted even when the action is then
    /// refused), apply the action, store the result.
    async fn act(
        &self,
        negotiation_id: Uuid,
        actor_id: Uuid,
        action: NegotiationAction,
    ) -> Result<Negotiation, ServiceError> {
        let mut negotiation = self.load(negotiation_id).await?;
        let now = Utc::now();

        if negotiation.expire_if_due(now) {
            negotiation = self.repo.update_negotiation(&negotiation).await?;
            tracing::info!(negotiation_id = %negotiation.id, "negotiation expired");
        }

        let from = negotiation.status;
        if let Err(e) = negotiation.apply(actor_id, action, now) {
            tracing::debug!(negotiation_id = %negotiation.id, actor_id = %actor_id, "refused: {}", e);
            return Err(e);
        }

        let updated = self.repo.update_negotiation(&negotiation).await?;
        tracing::info!(
            negotiation_id = %updated.id,
            "negotiation {} -> {}",
            from.to_str(),
            updated.status.to_str()
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{ListingExt, MemoryStore, NegotiationExt},
        models::listingmodel::Listing,
    };

    struct Fixture {
        store: Arc<MemoryStore>,
        service: NegotiationService,
        listing: Listing,
        tenant: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let listing = Listing {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Single room near North Campus".to_string(),
            address: "14 Hudson Lane".to_string(),
            city: "Delhi".to_string(),
            latitude: Some(28.6939),
            longitude: Some(77.2050),
            price: 20000,
            amenities: vec!["Wi-Fi".to_string(), "AC".to_string()],
            created_at: Utc::now(),
        };
        store.save_listing(&listing).await.unwrap();

        Fixture {
            service: NegotiationService::new(store.clone(), 168),
            store,
            listing,
            tenant: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_full_negotiation_flow() {
        let f = fixture().await;
        let n = f
            .service
            .propose(f.listing.id, f.tenant, 16000, 12, Some("I need long-term accommodation".into()))
            .await
            .unwrap();
        assert_eq!(n.status, NegotiationStatus::Proposed);
        assert_eq!(n.original_price, 20000);
        assert_eq!(n.owner_id, f.listing.owner_id);
        assert!(n.expires_at.unwrap() > n.created_at);

        let n = f
            .service
            .counter(n.id, f.listing.owner_id, 18000, Some("I can offer this for 12 months".into()))
            .await
            .unwrap();
        assert_eq!(n.status, NegotiationStatus::Countered);
        assert_eq!(n.final_price, None);

        let accepted = f.service.accept_counter(n.id, f.tenant).await.unwrap();
        assert!(accepted.can_book);
        assert_eq!(accepted.final_price, 18000);
        assert_eq!(accepted.savings, 2000);
        assert_eq!(accepted.negotiation.status, NegotiationStatus::Accepted);
        assert_eq!(accepted.negotiation.original_price, 20000);

        let stored = f.store.get_negotiation(n.id).await.unwrap().unwrap();
        assert_eq!(stored.final_price, Some(18000));
        assert!(stored.response_date.is_some());
    }

    #[tokio::test]
    async fn test_propose_validation() {
        let f = fixture().await;
        for price in [0, -5, MAX_MONTHLY_RENT + 1] {
            let err = f.service.propose(f.listing.id, f.tenant, price, 12, None).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
        let err = f.service.propose(f.listing.id, f.tenant, 15000, 0, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = f.service.propose(Uuid::new_v4(), f.tenant, 15000, 12, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Listing", .. }));

        let err = f
            .service
            .propose(f.listing.id, f.listing.owner_id, 15000, 12, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Permission(_)));
    }

    #[tokio::test]
    async fn test_counter_by_tenant_is_refused() {
        let f = fixture().await;
        let n = f.service.propose(f.listing.id, f.tenant, 16000, 6, None).await.unwrap();
        let err = f.service.counter(n.id, f.tenant, 17000, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Permission(_)));
    }

    #[tokio::test]
    async fn test_accept_before_counter_is_state_error() {
        let f = fixture().await;
        let n = f.service.propose(f.listing.id, f.tenant, 16000, 6, None).await.unwrap();
        let err = f.service.accept_counter(n.id, f.tenant).await.unwrap_err();
        assert!(matches!(err, ServiceError::State(ref m) if m.contains("No counter offer to accept")));
    }

    #[tokio::test]
    async fn test_no_mutation_after_rejection() {
        let f = fixture().await;
        let n = f.service.propose(f.listing.id, f.tenant, 16000, 6, None).await.unwrap();
        let n = f.service.reject(n.id, f.listing.owner_id, Some("Price is firm".into())).await.unwrap();
        assert_eq!(n.status, NegotiationStatus::Rejected);

        let err = f.service.counter(n.id, f.listing.owner_id, 19000, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::State(_)));
        let err = f.service.accept_counter(n.id, f.tenant).await.unwrap_err();
        assert!(matches!(err, ServiceError::State(_)));
    }

    fn stale_negotiation(f: &Fixture, status: NegotiationStatus) -> Negotiation {
        let now = Utc::now();
        Negotiation {
            id: Uuid::new_v4(),
            listing_id: f.listing.id,
            tenant_id: f.tenant,
            owner_id: f.listing.owner_id,
            original_price: 20000,
            proposed_price: 15000,
            counter_offer: if status == NegotiationStatus::Countered { Some(18000) } else { None },
            final_price: None,
            duration: 3,
            message: None,
            owner_message: None,
            status,
            created_at: now - Duration::days(10),
            expires_at: Some(now - Duration::days(3)),
            response_date: None,
            updated_at: now - Duration::days(10),
        }
    }

    #[tokio::test]
    async fn test_expired_counter_cannot_be_accepted() {
        let f = fixture().await;
        let stale = stale_negotiation(&f, NegotiationStatus::Countered);
        f.store.save_negotiation(&stale).await.unwrap();

        let err = f.service.accept_counter(stale.id, f.tenant).await.unwrap_err();
        assert!(matches!(err, ServiceError::Expired(id) if id == stale.id));

        let stored = f.store.get_negotiation(stale.id).await.unwrap().unwrap();
        assert_eq!(stored.status, NegotiationStatus::Expired);
        assert_eq!(stored.final_price, None);

        let err = f.service.reject(stale.id, f.tenant, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Expired(_)));
    }

    #[tokio::test]
    async fn test_reads_apply_lazy_expiry() {
        let f = fixture().await;
        let stale = stale_negotiation(&f, NegotiationStatus::Proposed);
        f.store.save_negotiation(&stale).await.unwrap();

        let seen = f.service.get(stale.id, f.listing.owner_id).await.unwrap();
        assert_eq!(seen.status, NegotiationStatus::Expired);

        let listed = f.service.list_for_user(f.tenant).await.unwrap();
        assert_eq!(listed[0].status, NegotiationStatus::Expired);

        let err = f.service.get(stale.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Permission(_)));
    }
}
