use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorMessage, HttpError};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Tokens are minted by the identity provider; this one signs test fixtures.
#[cfg(test)]
pub fn create_token(
    user_id: &str,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if user_id.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = chrono::Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + chrono::Duration::minutes(expires_in_minutes)).timestamp() as usize;
    let claims = TokenClaims {
        sub: user_id.to_string(),
        iat,
        exp,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<String, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    );

    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(_) => Err(HttpError::unauthorized(ErrorMessage::InvalidToken.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip_keeps_subject() {
        let token = create_token("5b1c7f0e", b"secret", 10).unwrap();
        assert_eq!(decode_token(token, b"secret").unwrap(), "5b1c7f0e");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token("5b1c7f0e", b"secret", 10).unwrap();
        assert!(decode_token(token, b"other").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = create_token("5b1c7f0e", b"secret", -10).unwrap();
        assert!(decode_token(token, b"secret").is_err());
    }

    #[test]
    fn test_empty_subject_is_refused() {
        assert!(create_token("", b"secret", 10).is_err());
    }
}
