pub mod bookingdb;
pub mod listingdb;
pub mod memory;
pub mod negotiationdb;

use std::fmt::Debug;

use sqlx::{Pool, Postgres};
use thiserror::Error;
use uuid::Uuid;

pub use bookingdb::BookingExt;
pub use listingdb::ListingExt;
pub use memory::MemoryStore;
pub use negotiationdb::NegotiationExt;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("record {0} already exists")]
    Duplicate(Uuid),

    #[error("record {0} does not exist")]
    Missing(Uuid),
}

/// Everything the services need from a backing store. Implemented by the
/// Postgres-backed [`DBClient`] and by [`MemoryStore`].
pub trait Repository: ListingExt + NegotiationExt + BookingExt + Send + Sync + Debug {}

impl<T> Repository for T where T: ListingExt + NegotiationExt + BookingExt + Send + Sync + Debug {}

#[derive(Debug, Clone)]
pub struct DBClient {
    pool: Pool<Postgres>,
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
