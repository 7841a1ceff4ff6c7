//! Bearer-token authentication: password hashing, token minting, and the
//! extractor project routes use to resolve the calling account.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::AppState;
use super::models::ErrorResponse;
use crate::storage::database;

pub const TOKEN_TTL_HOURS: i64 = 12;

/// Salted SHA-256, stored as `<salt-hex>$<digest-hex>`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
        return false;
    };
    salted_digest(&salt, password).as_slice() == expected.as_slice()
}

fn salted_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// 32 random bytes, hex-encoded.
pub fn mint_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn token_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::hours(TOKEN_TTL_HOURS)
}

/// The authenticated caller's email, resolved from `Authorization: Bearer`.
pub struct AuthUser(pub String);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        let Some(token) = token else {
            return Err(unauthorized("Missing bearer token"));
        };

        let lookup = {
            let conn = state.db();
            database::find_session_email(&conn, &token)
        };

        match lookup {
            Ok(Some(email)) => Ok(AuthUser(email)),
            Ok(None) => Err(unauthorized("Invalid or expired token")),
            Err(e) => Err(ErrorResponse::internal(e)),
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let stored = hash_password("s3cret");
        assert!(stored.contains('$'));
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("s3cret"), hash_password("s3cret"));
    }

    #[test]
    fn test_verify_rejects_malformed_hashes() {
        assert!(!verify_password("s3cret", "no-separator"));
        assert!(!verify_password("s3cret", "zz$not-hex"));
    }

    #[test]
    fn test_mint_token_shape() {
        let token = mint_token();
        assert_eq!(token.len(), 64);
        assert_ne!(token, mint_token());
    }

    #[test]
    fn test_token_expiry_is_in_the_future() {
        assert!(token_expiry() > Utc::now());
    }
}
