/**
 * Authentication Routes
 * Admin login issuing a short-lived JWT, verified server-side on every
 * mutating request. Replaces the old client-held admin flag.
 */
use axum::{http::HeaderMap, Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ============================================================================
// Configuration
// ============================================================================

lazy_static::lazy_static! {
    /// JWT secret key from environment
    pub static ref JWT_SECRET: String = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "default-jwt-secret-change-in-production".to_string());

    /// Admin email from environment
    pub static ref ADMIN_EMAIL: String = std::env::var("ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@example.com".to_string());

    /// Admin password hash from environment (or plain password to hash)
    pub static ref ADMIN_PASSWORD_HASH: String = {
        // First try ADMIN_HASH_PASSWORD (already hashed)
        if let Ok(hashed) = std::env::var("ADMIN_HASH_PASSWORD") {
            hashed
        } else if let Ok(plain) = std::env::var("ADMIN_PASSWORD") {
            hash(&plain, DEFAULT_COST).unwrap_or_default()
        } else {
            // Default password "admin123" hashed
            hash("admin123", DEFAULT_COST).unwrap_or_default()
        }
    };
}

/// Access token expiry in minutes
const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60;

// ============================================================================
// Types
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub access_token: String,
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    pub role: String,
}

// ============================================================================
// Token helpers
// ============================================================================

/// Creates a signed access token for the admin user.
pub fn issue_access_token(email: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: "admin".to_string(),
        email: email.to_string(),
        role: "admin".to_string(),
        exp: (now + Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
}

/// Decodes and validates an access token, returning its claims.
pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Extracts and verifies the bearer token; used by every mutating handler
/// and the contact listing.
pub fn require_admin(headers: &HeaderMap) -> Result<Claims, ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized("Authorization required"))?;

    verify_access_token(token).map_err(|_| ApiError::Unauthorized("Invalid or expired token"))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/login - Exchange the admin credential for an access token
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let credentials_ok = payload.email == *ADMIN_EMAIL
        && verify(&payload.password, &ADMIN_PASSWORD_HASH).unwrap_or(false);

    if !credentials_ok {
        tracing::warn!(email = %payload.email, "failed login attempt");
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    let access_token = issue_access_token(&payload.email)
        .map_err(|e| ApiError::Internal(format!("failed to issue token: {}", e)))?;

    tracing::info!("admin login succeeded");

    Ok(Json(LoginResponse {
        success: true,
        access_token,
        expires_in: ACCESS_TOKEN_EXPIRY_MINUTES * 60,
        user: UserInfo {
            email: payload.email,
            role: "admin".to_string(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_round_trips() {
        let token = issue_access_token("admin@example.com").unwrap();
        let claims = verify_access_token(&token).unwrap();
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_access_token("not.a.token").is_err());
    }

    #[test]
    fn test_require_admin_needs_bearer_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            require_admin(&headers),
            Err(ApiError::Unauthorized(_))
        ));

        let mut headers = HeaderMap::new();
        let token = issue_access_token("admin@example.com").unwrap();
        headers.insert(
            "authorization",
            format!("Bearer {}", token).parse().unwrap(),
        );
        assert!(require_admin(&headers).is_ok());
    }
}
