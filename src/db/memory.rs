// db/memory.rs
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::{BookingExt, ListingExt, NegotiationExt, StoreError},
    models::{
        bookingmodel::Booking,
        listingmodel::{Listing, ListingFilters},
        negotiationmodel::Negotiation,
    },
};

/// In-process store backing local runs and tests. Records are kept in
/// insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    listings: RwLock<Vec<Listing>>,
    negotiations: RwLock<Vec<Negotiation>>,
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with fixture listings.
    pub fn with_listings(listings: Vec<Listing>) -> Self {
        MemoryStore {
            listings: RwLock::new(listings),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ListingExt for MemoryStore {
    async fn save_listing(&self, listing: &Listing) -> Result<Listing, StoreError> {
        let mut listings = self.listings.write().await;
        if listings.iter().any(|l| l.id == listing.id) {
            return Err(StoreError::Duplicate(listing.id));
        }
        listings.push(listing.clone());
        Ok(listing.clone())
    }

    async fn get_listing(&self, listing_id: Uuid) -> Result<Option<Listing>, StoreError> {
        let listings = self.listings.read().await;
        Ok(listings.iter().find(|l| l.id == listing_id).cloned())
    }

    async fn get_listings(&self, filters: &ListingFilters) -> Result<Vec<Listing>, StoreError> {
        let listings = self.listings.read().await;
        let mut matching: Vec<Listing> = listings
            .iter()
            .filter(|l| filters.matches(l))
            .cloned()
            .collect();
        matching.sort_by_key(|l| l.created_at);
        Ok(matching)
    }
}

#[async_trait]
impl NegotiationExt for MemoryStore {
    async fn save_negotiation(&self, negotiation: &Negotiation) -> Result<Negotiation, StoreError> {
        let mut negotiations = self.negotiations.write().await;
        if negotiations.iter().any(|n| n.id == negotiation.id) {
            return Err(StoreError::Duplicate(negotiation.id));
        }
        negotiations.push(negotiation.clone());
        Ok(negotiation.clone())
    }

    async fn get_negotiation(&self, negotiation_id: Uuid) -> Result<Option<Negotiation>, StoreError> {
        let negotiations = self.negotiations.read().await;
        Ok(negotiations.iter().find(|n| n.id == negotiation_id).cloned())
    }

    async fn update_negotiation(&self, negotiation: &Negotiation) -> Result<Negotiation, StoreError> {
        let mut negotiations = self.negotiations.write().await;
        let stored = negotiations
            .iter_mut()
            .find(|n| n.id == negotiation.id)
            .ok_or(StoreError::Missing(negotiation.id))?;

        stored.counter_offer = negotiation.counter_offer;
        stored.final_price = negotiation.final_price;
        stored.owner_message = negotiation.owner_message.clone();
        stored.status = negotiation.status;
        stored.response_date = negotiation.response_date;
        stored.updated_at = negotiation.updated_at;

        Ok(stored.clone())
    }

    async fn get_negotiations_for_user(&self, user_id: Uuid) -> Result<Vec<Negotiation>, StoreError> {
        let negotiations = self.negotiations.read().await;
        let mut mine: Vec<Negotiation> = negotiations
            .iter()
            .filter(|n| n.tenant_id == user_id || n.owner_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }
}

#[async_trait]
impl BookingExt for MemoryStore {
    async fn save_booking(&self, booking: &Booking) -> Result<Booking, StoreError> {
        let mut bookings = self.bookings.write().await;
        if bookings.iter().any(|b| b.id == booking.id) {
            return Err(StoreError::Duplicate(booking.id));
        }
        bookings.push(booking.clone());
        Ok(booking.clone())
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().find(|b| b.id == booking_id).cloned())
    }

    async fn update_booking(&self, booking: &Booking) -> Result<Booking, StoreError> {
        let mut bookings = self.bookings.write().await;
        let stored = bookings
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or(StoreError::Missing(booking.id))?;

        stored.status = booking.status;
        stored.payment_status = booking.payment_status;
        stored.payment_method = booking.payment_method;
        stored.transaction_id = booking.transaction_id.clone();
        stored.tenant_confirmed_payment = booking.tenant_confirmed_payment;
        stored.owner_confirmed_payment = booking.owner_confirmed_payment;
        stored.paid_at = booking.paid_at;
        stored.updated_at = booking.updated_at;

        Ok(stored.clone())
    }

    async fn get_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.read().await;
        let mut mine: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.tenant_id == user_id || b.owner_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::negotiationmodel::NegotiationStatus;

    fn listing(city: &str, price: i64) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: format!("Room in {}", city),
            address: "12 College Road".to_string(),
            city: city.to_string(),
            latitude: None,
            longitude: None,
            price,
            amenities: vec!["Wi-Fi".to_string()],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_listing_filters() {
        let store = MemoryStore::with_listings(vec![
            listing("Delhi", 12000),
            listing("Noida", 8000),
            listing("delhi", 25000),
        ]);

        let delhi = store
            .get_listings(&ListingFilters { city: Some("DELHI".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(delhi.len(), 2);

        let cheap = store
            .get_listings(&ListingFilters { max_price: Some(12000), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(cheap.len(), 2);
        assert!(cheap.iter().all(|l| l.price <= 12000));
    }

    #[tokio::test]
    async fn test_duplicate_listing_is_refused() {
        let store = MemoryStore::new();
        let l = listing("Delhi", 12000);
        store.save_listing(&l).await.unwrap();
        assert!(matches!(store.save_listing(&l).await, Err(StoreError::Duplicate(id)) if id == l.id));
    }

    #[tokio::test]
    async fn test_update_never_rewrites_original_price() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut n = Negotiation {
            id: Uuid::new_v4(),
            listing_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            original_price: 20000,
            proposed_price: 16000,
            counter_offer: None,
            final_price: None,
            duration: 12,
            message: None,
            owner_message: None,
            status: NegotiationStatus::Proposed,
            created_at: now,
            expires_at: None,
            response_date: None,
            updated_at: now,
        };
        store.save_negotiation(&n).await.unwrap();

        n.original_price = 1;
        n.status = NegotiationStatus::Rejected;
        let stored = store.update_negotiation(&n).await.unwrap();
        assert_eq!(stored.original_price, 20000);
        assert_eq!(stored.status, NegotiationStatus::Rejected);

        n.id = Uuid::new_v4();
        assert!(matches!(store.update_negotiation(&n).await, Err(StoreError::Missing(_))));
    }
}
