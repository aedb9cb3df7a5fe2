use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::{DBClient, StoreError},
    models::listingmodel::{Listing, ListingFilters},
};

const LISTING_COLUMNS: &str =
    "id, owner_id, title, address, city, latitude, longitude, price, amenities, created_at";

#[async_trait]
pub trait ListingExt {
    async fn save_listing(&self, listing: &Listing) -> Result<Listing, StoreError>;

    async fn get_listing(&self, listing_id: Uuid) -> Result<Option<Listing>, StoreError>;

    /// Matching listings, oldest first.
    async fn get_listings(&self, filters: &ListingFilters) -> Result<Vec<Listing>, StoreError>;
}

#[async_trait]
impl ListingExt for DBClient {
    async fn save_listing(&self, listing: &Listing) -> Result<Listing, StoreError> {
        let query = format!(
            r#"
            INSERT INTO listings ({LISTING_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {LISTING_COLUMNS}
            "#
        );

        let saved = sqlx::query_as::<_, Listing>(&query)
            .bind(listing.id)
            .bind(listing.owner_id)
            .bind(&listing.title)
            .bind(&listing.address)
            .bind(&listing.city)
            .bind(listing.latitude)
            .bind(listing.longitude)
            .bind(listing.price)
            .bind(&listing.amenities)
            .bind(listing.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }

    async fn get_listing(&self, listing_id: Uuid) -> Result<Option<Listing>, StoreError> {
        let query = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1");

        let listing = sqlx::query_as::<_, Listing>(&query)
            .bind(listing_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    async fn get_listings(&self, filters: &ListingFilters) -> Result<Vec<Listing>, StoreError> {
        let query = format!(
            r#"
            SELECT {LISTING_COLUMNS} FROM listings
            WHERE ($1::TEXT IS NULL OR LOWER(city) = LOWER($1))
              AND ($2::BIGINT IS NULL OR price >= $2)
              AND ($3::BIGINT IS NULL OR price <= $3)
            ORDER BY created_at ASC
            "#
        );

        let listings = sqlx::query_as::<_, Listing>(&query)
            .bind(filters.city.as_deref())
            .bind(filters.min_price)
            .bind(filters.max_price)
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }
}
