use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::listingdtos::{CreateListingDto, ListingQueryDto, NearbyListingDto, NearbyQueryDto},
    error::HttpError,
    middleware::{auth, AuthUser},
    models::listingmodel::ListingFilters,
    utils::geo::{filter_by_distance, sort_by_distance},
    AppState,
};

pub fn listings_handler() -> Router {
    Router::new()
        .route(
            "/",
            get(get_listings).merge(post(create_listing).layer(middleware::from_fn(auth))),
        )
        .route("/nearby", get(get_nearby_listings))
        .route("/:listing_id", get(get_listing))
}

pub async fn get_listings(
    WithRejection(Query(query_params), _): WithRejection<Query<ListingQueryDto>, HttpError>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let listings = app_state.repo
        .get_listings(&ListingFilters::from(query_params))
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "listings": listings,
            "total": listings.len()
        }
    })))
}

/// Listings within `radiusKm` of a point, nearest first.
pub async fn get_nearby_listings(
    WithRejection(Query(query_params), _): WithRejection<Query<NearbyQueryDto>, HttpError>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let origin = query_params.origin();
    let radius_km = query_params.radius();

    let listings = app_state.repo
        .get_listings(&ListingFilters::default())
        .await?;

    let nearby: Vec<NearbyListingDto> = sort_by_distance(filter_by_distance(listings, origin, radius_km), origin)
        .into_iter()
        .map(NearbyListingDto::from)
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "listings": nearby,
            "total": nearby.len(),
            "origin": origin,
            "radiusKm": radius_km
        }
    })))
}

pub async fn get_listing(
    WithRejection(Path(listing_id), _): WithRejection<Path<Uuid>, HttpError>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let listing = app_state.repo
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| HttpError::not_found("Listing not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "listing": listing
        }
    })))
}

//Owner lists a room
pub async fn create_listing(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(body), _): WithRejection<Json<CreateListingDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if body.latitude.is_some() != body.longitude.is_some() {
        return Err(HttpError::bad_request("Latitude and longitude must be provided together"));
    }

    let listing = app_state.repo
        .save_listing(&body.into_listing(user.user_id))
        .await?;

    tracing::info!(listing_id = %listing.id, owner_id = %listing.owner_id, "listing created");

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Listing created successfully",
        "data": {
            "listing": listing
        }
    })))
}
