// service/payment_service.rs
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::Repository,
    models::bookingmodel::{Booking, BookingStatus, PaymentMethod, PaymentStatus},
    service::error::ServiceError,
};

/// Records payment progress on bookings.
///
/// Online payments confirm the booking straight away. Offline payments keep it
/// pending until both tenant and owner have confirmed the money changed hands.
#[derive(Debug, Clone)]
pub struct PaymentService {
    repo: Arc<dyn Repository>,
}

impl PaymentService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn mark_paid_online(
        &self,
        booking_id: Uuid,
        tenant_id: Uuid,
        transaction_id: Option<String>,
    ) -> Result<Booking, ServiceError> {
        let mut booking = self.load_for_tenant(booking_id, tenant_id).await?;
        Self::require_awaiting_payment(&booking)?;

        let now = Utc::now();
        booking.payment_method = Some(PaymentMethod::Online);
        booking.transaction_id = transaction_id;
        booking.payment_status = PaymentStatus::Paid;
        booking.status = BookingStatus::Confirmed;
        booking.paid_at = Some(now);
        booking.updated_at = now;

        let updated = self.repo.update_booking(&booking).await?;
        tracing::info!(booking_id = %updated.id, "online payment recorded, booking confirmed");
        Ok(updated)
    }

    pub async fn choose_offline(&self, booking_id: Uuid, tenant_id: Uuid) -> Result<Booking, ServiceError> {
        let mut booking = self.load_for_tenant(booking_id, tenant_id).await?;
        Self::require_awaiting_payment(&booking)?;

        booking.payment_method = Some(PaymentMethod::Offline);
        booking.updated_at = Utc::now();

        let updated = self.repo.update_booking(&booking).await?;
        tracing::info!(booking_id = %updated.id, "offline payment selected, awaiting both parties");
        Ok(updated)
    }

    /// Either party confirms an offline payment; the second confirmation marks
    /// the booking paid and confirmed.
    pub async fn confirm_offline(&self, booking_id: Uuid, actor_id: Uuid) -> Result<Booking, ServiceError> {
        let mut booking = self.load(booking_id).await?;
        if !booking.is_party(actor_id) {
            return Err(ServiceError::Permission(
                "You are not a party to this booking".to_string(),
            ));
        }
        if booking.payment_method != Some(PaymentMethod::Offline) {
            return Err(ServiceError::State(
                "Offline payment has not been selected for this booking".to_string(),
            ));
        }
        Self::require_awaiting_payment(&booking)?;

        if actor_id == booking.tenant_id {
            booking.tenant_confirmed_payment = true;
        } else {
            booking.owner_confirmed_payment = true;
        }

        let now = Utc::now();
        if booking.tenant_confirmed_payment && booking.owner_confirmed_payment {
            booking.payment_status = PaymentStatus::Paid;
            booking.status = BookingStatus::Confirmed;
            booking.paid_at = Some(now);
        }
        booking.updated_at = now;

        let updated = self.repo.update_booking(&booking).await?;
        tracing::info!(
            booking_id = %updated.id,
            tenant_confirmed = updated.tenant_confirmed_payment,
            owner_confirmed = updated.owner_confirmed_payment,
            "offline payment confirmation recorded"
        );
        Ok(updated)
    }

    pub async fn cancel(&self, booking_id: Uuid, actor_id: Uuid) -> Result<Booking, ServiceError> {
        let mut booking = self.load(booking_id).await?;
        if !booking.is_party(actor_id) {
            return Err(ServiceError::Permission(
                "You are not a party to this booking".to_string(),
            ));
        }
        match booking.status {
            BookingStatus::Pending | BookingStatus::Confirmed => {}
            status => {
                return Err(ServiceError::State(format!(
                    "Cannot cancel a booking in status {}",
                    status.to_str()
                )))
            }
        }

        booking.status = BookingStatus::Cancelled;
        booking.updated_at = Utc::now();

        let updated = self.repo.update_booking(&booking).await?;
        tracing::info!(booking_id = %updated.id, cancelled_by = %actor_id, "booking cancelled");
        Ok(updated)
    }

    async fn load(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        self.repo
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Booking", booking_id))
    }

    async fn load_for_tenant(&self, booking_id: Uuid, tenant_id: Uuid) -> Result<Booking, ServiceError> {
        let booking = self.load(booking_id).await?;
        if booking.tenant_id != tenant_id {
            return Err(ServiceError::Permission(
                "Only the tenant can pay for this booking".to_string(),
            ));
        }
        Ok(booking)
    }

    fn require_awaiting_payment(booking: &Booking) -> Result<(), ServiceError> {
        if booking.status != BookingStatus::Pending || booking.payment_status != PaymentStatus::Pending {
            return Err(ServiceError::State(format!(
                "Booking is not awaiting payment. Status: {}",
                booking.status.to_str()
            )));
        }
        Ok(())
    }
}
