use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Role carried inside the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleClaim {
    pub title: String,
    pub priority: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,
    pub roles: Vec<RoleClaim>,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl JwtClaims {
    pub fn has_role(&self, title: &str) -> bool {
        self.roles.iter().any(|r| r.title == title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

struct Keys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

/// Issues and verifies HS256 access/refresh token pairs.
#[derive(Clone)]
pub struct JwtAuth {
    keys: Arc<Keys>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let keys = Keys {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
        };

        tracing::info!(
            access_ttl_secs = config.access_ttl_secs,
            refresh_ttl_secs = config.refresh_ttl_secs,
            "JWT auth initialized"
        );

        Self {
            keys: Arc::new(keys),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    pub fn issue_pair(&self, user_id: Uuid, roles: &[RoleClaim]) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.sign(
                user_id,
                roles,
                self.access_ttl_secs,
                &self.keys.access_encoding,
            )?,
            refresh_token: self.sign(
                user_id,
                roles,
                self.refresh_ttl_secs,
                &self.keys.refresh_encoding,
            )?,
        })
    }

    pub fn verify_access_token(&self, token: &str) -> Result<JwtClaims, TokenError> {
        Self::verify(token, &self.keys.access_decoding)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<JwtClaims, TokenError> {
        Self::verify(token, &self.keys.refresh_decoding)
    }

    fn sign(
        &self,
        user_id: Uuid,
        roles: &[RoleClaim],
        ttl_secs: i64,
        key: &EncodingKey,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id,
            roles: roles.to_vec(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, key).map_err(TokenError::Encode)
    }

    fn verify(token: &str, key: &DecodingKey) -> Result<JwtClaims, TokenError> {
        decode::<JwtClaims>(token, key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}
