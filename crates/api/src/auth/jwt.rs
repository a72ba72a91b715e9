//! JWT bearer tokens.
//!
//! Tokens are HS256-signed and carry exactly two claims: the user id and an
//! expiry timestamp.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rahnuma_core::types::DbId;
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub user_id: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in seconds (default: 3600).
    pub exp_delta_seconds: i64,
}

const DEFAULT_EXP_DELTA_SECONDS: i64 = 3600;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `JWT_SECRET`            | **yes**  | --      |
    /// | `JWT_EXP_DELTA_SECONDS` | no       | `3600`  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let exp_delta_seconds: i64 = std::env::var("JWT_EXP_DELTA_SECONDS")
            .unwrap_or_else(|_| DEFAULT_EXP_DELTA_SECONDS.to_string())
            .parse()
            .expect("JWT_EXP_DELTA_SECONDS must be a valid i64");

        Self {
            secret,
            exp_delta_seconds,
        }
    }
}

/// Why a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

impl TokenError {
    pub fn message(self) -> &'static str {
        match self {
            TokenError::Expired => "Token has expired",
            TokenError::Invalid => "Invalid token",
        }
    }
}

/// Generate a token for `user_id`. Returns the token and its expiry.
pub fn generate_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let exp = chrono::Utc::now().timestamp() + config.exp_delta_seconds;
    let claims = Claims { user_id, exp };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, exp))
}

/// Validate a token's signature and expiry, returning its [`Claims`].
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}
