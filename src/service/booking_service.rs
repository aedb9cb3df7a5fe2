// service/booking_service.rs
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::Repository,
    models::{
        bookingmodel::{Booking, BookingStatus, PaymentStatus},
        negotiationmodel::NegotiationStatus,
    },
    service::{error::ServiceError, negotiation_service::MAX_DURATION_MONTHS},
};

/// Platform rule for the refundable deposit taken with each booking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SecurityDepositPolicy {
    MonthsOfRent(i64),
    Fixed(i64),
}

impl SecurityDepositPolicy {
    /// `None` when the deposit overflows.
    pub fn deposit_for(&self, monthly_rent: i64) -> Option<i64> {
        match *self {
            SecurityDepositPolicy::MonthsOfRent(months) => monthly_rent.checked_mul(months),
            SecurityDepositPolicy::Fixed(amount) => Some(amount),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingService {
    repo: Arc<dyn Repository>,
    deposit_policy: SecurityDepositPolicy,
}

impl BookingService {
    pub fn new(repo: Arc<dyn Repository>, deposit_policy: SecurityDepositPolicy) -> Self {
        Self {
            repo,
            deposit_policy,
        }
    }

    /// Books a listing, at the negotiated price when `negotiation_id` points at an
    /// accepted negotiation, otherwise at the listing price. The negotiation
    /// itself is left untouched.
    pub async fn create_booking(
        &self,
        listing_id: Uuid,
        tenant_id: Uuid,
        move_in_date: NaiveDate,
        duration: i32,
        negotiation_id: Option<Uuid>,
    ) -> Result<Booking, ServiceError> {
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
                "You cannot book your own listing".to_string(),
            ));
        }

        let monthly_rent = match negotiation_id {
            Some(negotiation_id) => {
                let negotiation = self
                    .repo
                    .get_negotiation(negotiation_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Negotiation", negotiation_id))?;

                if negotiation.tenant_id != tenant_id {
                    return Err(ServiceError::State(
                        "Negotiation belongs to another tenant".to_string(),
                    ));
                }
                if negotiation.listing_id != listing.id {
                    return Err(ServiceError::State(
                        "Negotiation is for a different listing".to_string(),
                    ));
                }
                if negotiation.duration != duration {
                    return Err(ServiceError::State(format!(
                        "Negotiated price applies to a {} month stay",
                        negotiation.duration
                    )));
                }
                match (negotiation.status, negotiation.final_price) {
                    (NegotiationStatus::Accepted, Some(final_price)) => final_price,
                    _ => {
                        return Err(ServiceError::State(format!(
                            "Negotiation must be accepted before booking. Status: {}",
                            negotiation.status.to_str()
                        )))
                    }
                }
            }
            None => listing.price,
        };

        let too_large = || ServiceError::Validation("Booking amount is too large".to_string());
        let security_deposit = self.deposit_policy.deposit_for(monthly_rent).ok_or_else(too_large)?;

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            listing_id: listing.id,
            tenant_id,
            owner_id: listing.owner_id,
            negotiation_id,
            monthly_rent,
            security_deposit,
            move_in_date,
            duration,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            transaction_id: None,
            tenant_confirmed_payment: false,
            owner_confirmed_payment: false,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };

        if booking.total_amount().is_none() {
            return Err(too_large());
        }

        let saved = self.repo.save_booking(&booking).await?;
        tracing::info!(
            booking_id = %saved.id,
            listing_id = %saved.listing_id,
            monthly_rent = saved.monthly_rent,
            negotiated = saved.negotiation_id.is_some(),
            "booking created"
        );

        Ok(saved)
    }

    pub async fn get(&self, booking_id: Uuid, actor_id: Uuid) -> Result<Booking, ServiceError> {
        let booking = self.load(booking_id).await?;
        if !booking.is_party(actor_id) {
            return Err(ServiceError::Permission(
                "You are not a party to this booking".to_string(),
            ));
        }
        Ok(booking)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, ServiceError> {
        Ok(self.repo.get_bookings_for_user(user_id).await?)
    }

    async fn load(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        self.repo
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Booking", booking_id))
    }
}
