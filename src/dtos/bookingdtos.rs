use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::bookingmodel::{Booking, BookingStatus, PaymentMethod, PaymentStatus};

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingDto {
    pub room_id: Uuid,
    pub negotiation_id: Option<Uuid>,

    /// Accepts a plain date or a full RFC 3339 timestamp.
    #[serde(deserialize_with = "date_or_datetime")]
    pub move_in_date: NaiveDate,

    #[validate(range(min = 1, max = 60, message = "Duration must be between 1 and 60 months"))]
    pub duration: i32,
}

fn date_or_datetime<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Ok(date);
    }
    raw.parse::<DateTime<Utc>>()
        .map(|at| at.date_naive())
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsDto {
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingDto {
    pub payment_status: Option<PaymentStatus>,
    pub status: Option<BookingStatus>,
    pub payment_details: Option<PaymentDetailsDto>,
}

/// What a PATCH on a booking asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingUpdate {
    Cancel,
    PaidOnline { transaction_id: Option<String> },
    ChooseOffline,
}

impl UpdateBookingDto {
    pub fn intent(self) -> Option<BookingUpdate> {
        if self.status == Some(BookingStatus::Cancelled) {
            return Some(BookingUpdate::Cancel);
        }
        match self.payment_details {
            Some(PaymentDetailsDto { payment_method: PaymentMethod::Online, transaction_id })
                if self.payment_status == Some(PaymentStatus::Paid) =>
            {
                Some(BookingUpdate::PaidOnline { transaction_id })
            }
            Some(PaymentDetailsDto { payment_method: PaymentMethod::Offline, .. }) => {
                Some(BookingUpdate::ChooseOffline)
            }
            _ => None,
        }
    }
}

/// A booking with its derived amounts filled in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponseDto {
    #[serde(flatten)]
    pub booking: Booking,
    pub total_amount: Option<i64>,
    pub move_out_date: Option<NaiveDate>,
    pub payment_overdue: bool,
}

impl BookingResponseDto {
    /// `payment_window` is how long a pending booking may stay unpaid.
    pub fn new(booking: Booking, payment_window: Duration, now: DateTime<Utc>) -> Self {
        BookingResponseDto {
            total_amount: booking.total_amount(),
            move_out_date: booking.move_out_date(),
            payment_overdue: booking.is_payment_overdue(payment_window, now),
            booking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_move_in_accepts_date_and_timestamp() {
        let plain: CreateBookingDto = serde_json::from_value(json!({
            "roomId": Uuid::nil(),
            "moveInDate": "2026-11-01",
            "duration": 12
        }))
        .unwrap();
        assert_eq!(plain.move_in_date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        assert_eq!(plain.negotiation_id, None);

        let stamped: CreateBookingDto = serde_json::from_value(json!({
            "roomId": Uuid::nil(),
            "negotiationId": Uuid::nil(),
            "moveInDate": "2026-11-01T09:30:00.000Z",
            "duration": 12
        }))
        .unwrap();
        assert_eq!(stamped.move_in_date, plain.move_in_date);
        assert_eq!(stamped.negotiation_id, Some(Uuid::nil()));
    }

    #[test]
    fn test_update_intent() {
        let online: UpdateBookingDto = serde_json::from_value(json!({
            "paymentStatus": "paid",
            "status": "confirmed",
            "paymentDetails": { "paymentMethod": "online", "transactionId": "pay_123" }
        }))
        .unwrap();
        assert_eq!(
            online.intent(),
            Some(BookingUpdate::PaidOnline { transaction_id: Some("pay_123".into()) })
        );

        let offline: UpdateBookingDto = serde_json::from_value(json!({
            "paymentStatus": "pending",
            "status": "pending",
            "paymentDetails": { "paymentMethod": "offline" }
        }))
        .unwrap();
        assert_eq!(offline.intent(), Some(BookingUpdate::ChooseOffline));

        let cancel: UpdateBookingDto = serde_json::from_value(json!({ "status": "cancelled" })).unwrap();
        assert_eq!(cancel.intent(), Some(BookingUpdate::Cancel));

        let nothing: UpdateBookingDto = serde_json::from_value(json!({ "status": "active" })).unwrap();
        assert_eq!(nothing.intent(), None);
    }

    #[test]
    fn test_response_includes_derived_fields() {
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::nil(),
            listing_id: Uuid::nil(),
            tenant_id: Uuid::nil(),
            owner_id: Uuid::nil(),
            negotiation_id: None,
            monthly_rent: 18000,
            security_deposit: 18000,
            move_in_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            duration: 12,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            transaction_id: None,
            tenant_confirmed_payment: false,
            owner_confirmed_payment: false,
            paid_at: None,
            created_at: now - Duration::hours(50),
            updated_at: now,
        };

        let fresh = BookingResponseDto::new(booking.clone(), Duration::hours(72), now);
        let value = serde_json::to_value(fresh).unwrap();
        assert_eq!(value["totalAmount"], 234000);
        assert_eq!(value["monthlyRent"], 18000);
        assert_eq!(value["moveOutDate"], "2027-11-01");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["paymentOverdue"], false);

        let lapsed = BookingResponseDto::new(booking, Duration::hours(48), now);
        assert_eq!(serde_json::to_value(lapsed).unwrap()["paymentOverdue"], true);
    }
}
