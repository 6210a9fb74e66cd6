//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::domain::{DomainResult, User};
use crate::shared::errors::{DomainError, InfraError};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl From<&SecurityConfig> for JwtConfig {
    fn from(security: &SecurityConfig) -> Self {
        Self {
            secret: security.jwt_secret.clone(),
            expiration_hours: security.jwt_expiration_hours,
            issuer: security.jwt_issuer.clone(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&SecurityConfig::default())
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn for_user(user: &User, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

/// Sign a token for `user`
pub fn create_token(user: &User, config: &JwtConfig) -> DomainResult<String> {
    sign_claims(&TokenClaims::for_user(user, config), config)
}

pub fn sign_claims(claims: &TokenClaims, config: &JwtConfig) -> DomainResult<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| InfraError::Crypto(format!("failed to sign token: {}", e)).into())
}

/// Verify and decode a token.
///
/// Expired tokens map to `TokenExpired`, every other failure to `InvalidToken`.
pub fn verify_token(token: &str, config: &JwtConfig) -> DomainResult<TokenClaims> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);
    validation.leeway = 0;

    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => DomainError::TokenExpired,
        _ => DomainError::InvalidToken,
    })
}
