use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::{DBClient, StoreError},
    models::bookingmodel::Booking,
};

const BOOKING_COLUMNS: &str = "id, listing_id, tenant_id, owner_id, negotiation_id, \
    monthly_rent, security_deposit, move_in_date, duration, status, payment_status, \
    payment_method, transaction_id, tenant_confirmed_payment, owner_confirmed_payment, \
    paid_at, created_at, updated_at";

#[async_trait]
pub trait BookingExt {
    async fn save_booking(&self, booking: &Booking) -> Result<Booking, StoreError>;

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// Writes status and payment fields back; the financial terms are fixed at creation.
    async fn update_booking(&self, booking: &Booking) -> Result<Booking, StoreError>;

    /// Bookings where the user is tenant or owner, newest first.
    async fn get_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError>;
}

#[async_trait]
impl BookingExt for DBClient {
    async fn save_booking(&self, booking: &Booking) -> Result<Booking, StoreError> {
        let query = format!(
            r#"
            INSERT INTO bookings ({BOOKING_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let saved = sqlx::query_as::<_, Booking>(&query)
            .bind(booking.id)
            .bind(booking.listing_id)
            .bind(booking.tenant_id)
            .bind(booking.owner_id)
            .bind(booking.negotiation_id)
            .bind(booking.monthly_rent)
            .bind(booking.security_deposit)
            .bind(booking.move_in_date)
            .bind(booking.duration)
            .bind(booking.status)
            .bind(booking.payment_status)
            .bind(booking.payment_method)
            .bind(&booking.transaction_id)
            .bind(booking.tenant_confirmed_payment)
            .bind(booking.owner_confirmed_payment)
            .bind(booking.paid_at)
            .bind(booking.created_at)
            .bind(booking.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");

        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    async fn update_booking(&self, booking: &Booking) -> Result<Booking, StoreError> {
        let query = format!(
            r#"
            UPDATE bookings
            SET status = $2,
                payment_status = $3,
                payment_method = $4,
                transaction_id = $5,
                tenant_confirmed_payment = $6,
                owner_confirmed_payment = $7,
                paid_at = $8,
                updated_at = $9
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Booking>(&query)
            .bind(booking.id)
            .bind(booking.status)
            .bind(booking.payment_status)
            .bind(booking.payment_method)
            .bind(&booking.transaction_id)
            .bind(booking.tenant_confirmed_payment)
            .bind(booking.owner_confirmed_payment)
            .bind(booking.paid_at)
            .bind(booking.updated_at)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or(StoreError::Missing(booking.id))
    }

    async fn get_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let query = format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE tenant_id = $1 OR owner_id = $1
            ORDER BY created_at DESC
            "#
        );

        let bookings = sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }
}
