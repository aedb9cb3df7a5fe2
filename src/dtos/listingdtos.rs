use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::listingmodel::{Listing, ListingFilters},
    utils::geo::{format_distance, GeoPoint, WithDistance},
};

pub const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingDto {
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 3, max = 500, message = "Address must be between 3 and 500 characters"))]
    pub address: String,

    #[validate(length(min = 2, max = 100, message = "City is required"))]
    pub city: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,

    #[validate(range(min = 1, max = 10000000, message = "Price must be between 1 and 10000000"))]
    pub price: i64,

    #[serde(default)]
    pub amenities: Vec<String>,
}

impl CreateListingDto {
    pub fn into_listing(self, owner_id: Uuid) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            owner_id,
            title: self.title,
            address: self.address,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            price: self.price,
            amenities: self.amenities,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingQueryDto {
    pub city: Option<String>,

    #[validate(range(min = 0))]
    pub min_price: Option<i64>,

    #[validate(range(min = 0))]
    pub max_price: Option<i64>,
}

impl From<ListingQueryDto> for ListingFilters {
    fn from(query: ListingQueryDto) -> Self {
        ListingFilters {
            city: query.city,
            min_price: query.min_price,
            max_price: query.max_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQueryDto {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: f64,

    #[validate(range(min = 0.0, message = "Radius cannot be negative"))]
    pub radius_km: Option<f64>,
}

impl NearbyQueryDto {
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    pub fn radius(&self) -> f64 {
        self.radius_km.unwrap_or(DEFAULT_RADIUS_KM)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyListingDto {
    #[serde(flatten)]
    pub listing: Listing,
    pub distance_km: f64,
    pub distance: String,
}

impl From<WithDistance<Listing>> for NearbyListingDto {
    fn from(ranked: WithDistance<Listing>) -> Self {
        NearbyListingDto {
            distance: format_distance(ranked.distance_km),
            distance_km: ranked.distance_km,
            listing: ranked.item,
        }
    }
}
