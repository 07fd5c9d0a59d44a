//! JWT token management
//!
//! Issues and validates the signed, time-bound bearer tokens carried by
//! authenticated requests.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::AuthConfig;
use crate::error::{GatewayError, Result};

/// Claim set carried by every issued token.
///
/// `sub`, `iat` and `exp` are mandatory; any extra claims supplied at issue
/// time travel in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the user's email)
    pub sub: String,
    /// Issued-at, epoch seconds
    pub iat: i64,
    /// Expiry, epoch seconds
    pub exp: i64,
    /// Additional pass-through claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JWT token service
pub struct TokenService {
    /// Encoding key
    encoding_key: EncodingKey,
    /// Decoding key
    decoding_key: DecodingKey,
    /// Header reused for every issued token
    header: Header,
    /// Validation configuration
    validation: Validation,
    /// Token lifetime
    ttl: Duration,
}

impl TokenService {
    /// Create a new token service from the authentication configuration.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let algorithm = parse_algorithm(&config.jwt_algorithm)?;

        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(algorithm),
            validation,
            ttl: Duration::minutes(config.token_ttl_minutes),
        })
    }

    /// Issue a signed token for `subject`.
    ///
    /// Extra claims are merged last and may overwrite `sub`/`iat`/`exp` on
    /// key collision; the pass-through is intentional and not guarded.
    pub fn issue(
        &self,
        subject: &str,
        extra_claims: Option<&Map<String, Value>>,
    ) -> Result<String> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let mut payload = Map::new();
        payload.insert("sub".to_string(), Value::String(subject.to_string()));
        payload.insert("iat".to_string(), Value::from(now.timestamp()));
        payload.insert("exp".to_string(), Value::from(expires_at.timestamp()));
        if let Some(extras) = extra_claims {
            for (key, value) in extras {
                payload.insert(key.clone(), value.clone());
            }
        }

        encode(&self.header, &payload, &self.encoding_key)
            .map_err(|e| GatewayError::internal_with_source("token generation failed", e))
    }

    /// Validate and parse a token.
    ///
    /// `exp`, `iat` and `sub` must be present even when the signature checks
    /// out. Expiry surfaces as `TokenExpired`; every other structural or
    /// signature failure collapses into `TokenInvalid`.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let token_data: TokenData<Claims> = decode(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => GatewayError::TokenExpired,
                _ => GatewayError::TokenInvalid,
            })?;

        let claims = token_data.claims;

        // The library keeps a token alive at exp == now; here a token is dead
        // the second it reaches its expiry.
        if Utc::now().timestamp() >= claims.exp {
            return Err(GatewayError::TokenExpired);
        }

        Ok(claims)
    }
}

/// Resolve a configured algorithm name to a signing algorithm.
///
/// Only the HMAC family is supported; tokens are signed with a shared secret.
pub fn parse_algorithm(name: &str) -> Result<Algorithm> {
    match name {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(GatewayError::config(format!(
            "unsupported JWT algorithm: {other}"
        ))),
    }
}
