use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn to_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Active => "active",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Online,
    Offline,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub tenant_id: Uuid,
    pub owner_id: Uuid,
    pub negotiation_id: Option<Uuid>,

    // Financials, all in whole rupees
    pub monthly_rent: i64,
    pub security_deposit: i64,

    pub move_in_date: NaiveDate,
    pub duration: i32,

    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub tenant_confirmed_payment: bool,
    pub owner_confirmed_payment: bool,
    pub paid_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Rent for the whole stay plus the deposit. Derived, never stored.
    /// `None` if the amount does not fit in an `i64`.
    pub fn total_amount(&self) -> Option<i64> {
        self.monthly_rent
            .checked_mul(i64::from(self.duration))?
            .checked_add(self.security_deposit)
    }

    /// A pending, unpaid booking older than `window` has lapsed.
    pub fn is_payment_overdue(&self, window: Duration, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::Pending
            && self.payment_status != PaymentStatus::Paid
            && self.created_at + window < now
    }

    pub fn move_out_date(&self) -> Option<NaiveDate> {
        let months = u32::try_from(self.duration).ok()?;
        self.move_in_date.checked_add_months(Months::new(months))
    }

    pub fn is_party(&self, user_id: Uuid) -> bool {
        user_id == self.tenant_id || user_id == self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            listing_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            negotiation_id: None,
            monthly_rent: 18000,
            security_deposit: 18000,
            move_in_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            duration: 12,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            transaction_id: None,
            tenant_confirmed_payment: false,
            owner_confirmed_payment: false,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_total_amount() {
        assert_eq!(booking().total_amount(), Some(18000 * 12 + 18000));

        let mut huge = booking();
        huge.monthly_rent = i64::MAX / 2;
        assert_eq!(huge.total_amount(), None);
    }

    #[test]
    fn test_payment_overdue_after_window() {
        let window = Duration::hours(48);
        let now = Utc::now();

        let mut b = booking();
        b.created_at = now - Duration::hours(47);
        assert!(!b.is_payment_overdue(window, now));

        b.created_at = now - Duration::hours(49);
        assert!(b.is_payment_overdue(window, now));

        b.payment_status = PaymentStatus::Paid;
        assert!(!b.is_payment_overdue(window, now));

        b.payment_status = PaymentStatus::Pending;
        b.status = BookingStatus::Cancelled;
        assert!(!b.is_payment_overdue(window, now));
    }

    #[test]
    fn test_move_out_date_clamps_to_month_end() {
        let mut b = booking();
        assert_eq!(b.move_out_date(), NaiveDate::from_ymd_opt(2027, 1, 31));
        b.duration = 1;
        assert_eq!(b.move_out_date(), NaiveDate::from_ymd_opt(2026, 2, 28));
    }
}
