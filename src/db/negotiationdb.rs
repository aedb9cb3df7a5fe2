use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::{DBClient, StoreError},
    models::negotiationmodel::Negotiation,
};

const NEGOTIATION_COLUMNS: &str = "id, listing_id, tenant_id, owner_id, original_price, \
    proposed_price, counter_offer, final_price, duration, message, owner_message, status, \
    created_at, expires_at, response_date, updated_at";

#[async_trait]
pub trait NegotiationExt {
    async fn save_negotiation(&self, negotiation: &Negotiation) -> Result<Negotiation, StoreError>;

    async fn get_negotiation(&self, negotiation_id: Uuid) -> Result<Option<Negotiation>, StoreError>;

    /// Writes the mutable part of a negotiation back. Parties, listing and
    /// `original_price` are never rewritten.
    async fn update_negotiation(&self, negotiation: &Negotiation) -> Result<Negotiation, StoreError>;

    /// Negotiations where the user is tenant or owner, newest first.
    async fn get_negotiations_for_user(&self, user_id: Uuid) -> Result<Vec<Negotiation>, StoreError>;
}

#[async_trait]
impl NegotiationExt for DBClient {
    async fn save_negotiation(&self, negotiation: &Negotiation) -> Result<Negotiation, StoreError> {
        let query = format!(
            r#"
            INSERT INTO negotiations ({NEGOTIATION_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {NEGOTIATION_COLUMNS}
            "#
        );

        let saved = sqlx::query_as::<_, Negotiation>(&query)
            .bind(negotiation.id)
            .bind(negotiation.listing_id)
            .bind(negotiation.tenant_id)
            .bind(negotiation.owner_id)
            .bind(negotiation.original_price)
            .bind(negotiation.proposed_price)
            .bind(negotiation.counter_offer)
            .bind(negotiation.final_price)
            .bind(negotiation.duration)
            .bind(&negotiation.message)
            .bind(&negotiation.owner_message)
            .bind(negotiation.status)
            .bind(negotiation.created_at)
            .bind(negotiation.expires_at)
            .bind(negotiation.response_date)
            .bind(negotiation.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }

    async fn get_negotiation(&self, negotiation_id: Uuid) -> Result<Option<Negotiation>, StoreError> {
        let query = format!("SELECT {NEGOTIATION_COLUMNS} FROM negotiations WHERE id = $1");

        let negotiation = sqlx::query_as::<_, Negotiation>(&query)
            .bind(negotiation_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(negotiation)
    }

    async fn update_negotiation(&self, negotiation: &Negotiation) -> Result<Negotiation, StoreError> {
        let query = format!(
            r#"
            UPDATE negotiations
            SET counter_offer = $2,
                final_price = $3,
                owner_message = $4,
                status = $5,
                response_date = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING {NEGOTIATION_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Negotiation>(&query)
            .bind(negotiation.id)
            .bind(negotiation.counter_offer)
            .bind(negotiation.final_price)
            .bind(&negotiation.owner_message)
            .bind(negotiation.status)
            .bind(negotiation.response_date)
            .bind(negotiation.updated_at)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or(StoreError::Missing(negotiation.id))
    }

    async fn get_negotiations_for_user(&self, user_id: Uuid) -> Result<Vec<Negotiation>, StoreError> {
        let query = format!(
            r#"
            SELECT {NEGOTIATION_COLUMNS} FROM negotiations
            WHERE tenant_id = $1 OR owner_id = $1
            ORDER BY created_at DESC
            "#
        );

        let negotiations = sqlx::query_as::<_, Negotiation>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(negotiations)
    }
}
