use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::negotiationdtos::{CreateNegotiationDto, RespondAction, RespondNegotiationDto},
    error::HttpError,
    middleware::AuthUser,
    AppState,
};

pub fn negotiations_handler() -> Router {
    Router::new()
        .route("/", get(get_negotiations).post(create_negotiation))
        .route(
            "/:negotiation_id",
            get(get_negotiation).patch(respond_to_negotiation),
        )
        .route("/:negotiation_id/accept-counter", post(accept_counter))
}

//Tenant proposes a price
pub async fn create_negotiation(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(body), _): WithRejection<Json<CreateNegotiationDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let negotiation = app_state.negotiation_service
        .propose(
            body.listing_id,
            user.user_id,
            body.proposed_price,
            body.duration,
            body.message,
        )
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Price proposal sent to the owner",
        "data": negotiation
    })))
}

pub async fn get_negotiations(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let negotiations = app_state.negotiation_service
        .list_for_user(user.user_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "negotiations": negotiations,
            "total": negotiations.len()
        }
    })))
}

pub async fn get_negotiation(
    WithRejection(Path(negotiation_id), _): WithRejection<Path<Uuid>, HttpError>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let negotiation = app_state.negotiation_service
        .get(negotiation_id, user.user_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": negotiation
    })))
}

//Owner counters or rejects, tenant rejects a counter
pub async fn respond_to_negotiation(
    WithRejection(Path(negotiation_id), _): WithRejection<Path<Uuid>, HttpError>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(body), _): WithRejection<Json<RespondNegotiationDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let negotiation = match body.action {
        RespondAction::Counter => {
            let counter_offer = body.counter_offer.ok_or_else(|| {
                HttpError::bad_request("counterOffer is required to counter")
            })?;
            app_state.negotiation_service
                .counter(negotiation_id, user.user_id, counter_offer, body.message)
                .await?
        }
        RespondAction::Reject => {
            app_state.negotiation_service
                .reject(negotiation_id, user.user_id, body.message)
                .await?
        }
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": format!("Negotiation {}", negotiation.status.to_str()),
        "data": negotiation
    })))
}

//Tenant accepts the owner's counter offer
pub async fn accept_counter(
    WithRejection(Path(negotiation_id), _): WithRejection<Path<Uuid>, HttpError>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let accepted = app_state.negotiation_service
        .accept_counter(negotiation_id, user.user_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Counter offer accepted! You can now proceed to book at the negotiated price.",
        "data": accepted
    })))
}
