use thiserror::Error;
use uuid::Uuid;
use axum::http::StatusCode;

use crate::{db::StoreError, error::{ErrorMessage, HttpError}};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Permission(String),

    #[error("{0}")]
    State(String),

    #[error("Negotiation {0} has expired")]
    Expired(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        ServiceError::NotFound { entity, id }
    }

    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::Permission(_) => "permission",
            ServiceError::State(_) => "state",
            ServiceError::Expired(_) => "expired",
            ServiceError::Database(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::State(_)
            | ServiceError::Expired(_) => StatusCode::BAD_REQUEST,

            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,

            ServiceError::Permission(_) => StatusCode::FORBIDDEN,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        if let ServiceError::Database(ref e) = error {
            tracing::error!("store failure: {}", e);
            return HttpError::new(
                ErrorMessage::ServerError.to_string(),
                error.kind(),
                error.status_code(),
            );
        }
        HttpError::new(error.to_string(), error.kind(), error.status_code())
    }
}

impl From<StoreError> for HttpError {
    fn from(error: StoreError) -> Self {
        ServiceError::from(error).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_and_state_share_status_but_not_kind() {
        let expired = ServiceError::Expired(Uuid::nil());
        let state = ServiceError::State("No counter offer to accept. Status: proposed".into());
        assert_eq!(expired.status_code(), state.status_code());
        assert_ne!(expired.kind(), state.kind());

        let http: HttpError = expired.into();
        assert_eq!(http.kind, "expired");
        assert_eq!(http.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_permission_maps_to_forbidden() {
        let http: HttpError = ServiceError::Permission("Only the owner can counter this negotiation".into()).into();
        assert_eq!(http.status, StatusCode::FORBIDDEN);
        assert_eq!(http.message, "Only the owner can counter this negotiation");
    }

    #[test]
    fn test_store_failures_are_not_leaked() {
        let http: HttpError = StoreError::Missing(Uuid::nil()).into();
        assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http.kind, "internal");
        assert_eq!(http.message, ErrorMessage::ServerError.to_string());
    }

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("Listing", Uuid::nil());
        assert_eq!(err.to_string(), format!("Listing {} not found", Uuid::nil()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
