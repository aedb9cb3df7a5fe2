use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::bookingdtos::{BookingResponseDto, BookingUpdate, CreateBookingDto, UpdateBookingDto},
    error::HttpError,
    middleware::AuthUser,
    models::bookingmodel::Booking,
    AppState,
};

pub fn bookings_handler() -> Router {
    Router::new()
        .route("/", get(get_bookings).post(create_booking))
        .route("/:booking_id", get(get_booking).patch(update_booking))
        .route("/:booking_id/confirm-payment", post(confirm_payment))
}

fn present(app_state: &AppState, booking: Booking) -> BookingResponseDto {
    BookingResponseDto::new(booking, app_state.env.payment_window(), Utc::now())
}

pub async fn create_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(body), _): WithRejection<Json<CreateBookingDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state.booking_service
        .create_booking(
            body.room_id,
            user.user_id,
            body.move_in_date,
            body.duration,
            body.negotiation_id,
        )
        .await?;

    let message = if booking.negotiation_id.is_some() {
        "Booking created at the negotiated price"
    } else {
        "Booking created"
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": message,
        "data": {
            "booking": present(&app_state, booking)
        }
    })))
}

pub async fn get_bookings(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let bookings: Vec<BookingResponseDto> = app_state.booking_service
        .list_for_user(user.user_id)
        .await?
        .into_iter()
        .map(|booking| present(&app_state, booking))
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "bookings": bookings,
            "total": bookings.len()
        }
    })))
}

pub async fn get_booking(
    WithRejection(Path(booking_id), _): WithRejection<Path<Uuid>, HttpError>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state.booking_service
        .get(booking_id, user.user_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "booking": present(&app_state, booking)
        }
    })))
}

/// Payment and cancellation updates. Online payment confirms the booking,
/// offline payment leaves it pending until both parties confirm.
pub async fn update_booking(
    WithRejection(Path(booking_id), _): WithRejection<Path<Uuid>, HttpError>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateBookingDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    let intent = body.intent().ok_or_else(|| {
        HttpError::bad_request("Unsupported booking update")
    })?;

    let payments = &app_state.payment_service;
    let (booking, message) = match intent {
        BookingUpdate::Cancel => (
            payments.cancel(booking_id, user.user_id).await?,
            "Booking cancelled successfully",
        ),
        BookingUpdate::PaidOnline { transaction_id } => (
            payments.mark_paid_online(booking_id, user.user_id, transaction_id).await?,
            "Payment successful! Your booking is confirmed.",
        ),
        BookingUpdate::ChooseOffline => (
            payments.choose_offline(booking_id, user.user_id).await?,
            "Offline payment selected. Booking will be confirmed after both parties verify payment.",
        ),
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": message,
        "data": {
            "booking": present(&app_state, booking)
        }
    })))
}

pub async fn confirm_payment(
    WithRejection(Path(booking_id), _): WithRejection<Path<Uuid>, HttpError>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state.payment_service
        .confirm_offline(booking_id, user.user_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "booking": present(&app_state, booking)
        }
    })))
}
