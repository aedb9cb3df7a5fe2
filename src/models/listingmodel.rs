use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::geo::{GeoPoint, HasCoordinates};

/// Ceiling for any monthly amount (listing price, offer, rent), in whole rupees.
pub const MAX_MONTHLY_RENT: i64 = 10_000_000;

/// A room offered on the marketplace. `price` is the asking monthly rent in whole rupees.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,

    pub title: String,
    pub address: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub price: i64,
    pub amenities: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

impl HasCoordinates for Listing {
    fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ListingFilters {
    pub city: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

impl ListingFilters {
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(city) = &self.city {
            if !listing.city.eq_ignore_ascii_case(city) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if listing.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if listing.price > max {
                return false;
            }
        }
        true
    }
}
