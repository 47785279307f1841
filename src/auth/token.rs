//! Token issuance and verification

use crate::auth::models::Role;
use crate::error::{Error, Result};
use crate::store::UserRecord;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role name; parsed into [`Role`] on verification
    pub role: String,
    pub firstname: String,
    pub lastname: String,
    pub office: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// Verified identity decoded from a token.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    pub id: Uuid,
    pub role: Role,
    pub firstname: String,
    pub lastname: String,
    pub office: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Mints and verifies signed, time-boxed session tokens.
///
/// Stateless; holds the signing keys and the single configured TTL used by
/// every issuance path. There is no default secret and no per-call-site TTL.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    /// Create a signed token for a user. Expiry is always issued-at + TTL.
    pub fn issue(&self, user: &UserRecord) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.to_string(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            office: user.office.clone(),
            iat: now,
            exp: now + self.ttl_minutes * 60,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| Error::TokenSigning(e.to_string()))
    }

    /// Validate a token and decode the caller's identity.
    ///
    /// Distinguishes [`Error::ExpiredCredential`] from
    /// [`Error::InvalidCredential`] so the server can log the precise reason;
    /// both render as the same generic denial on the wire.
    pub fn verify(&self, token: &str) -> Result<TokenIdentity> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => Error::ExpiredCredential,
                _ => Error::InvalidCredential(e.to_string()),
            }
        })?;
        let claims = data.claims;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| Error::InvalidCredential("malformed subject claim".to_string()))?;
        // Normalize the role into the closed enum here; nothing downstream
        // ever sees the raw string.
        let role: Role = claims
            .role
            .parse()
            .map_err(|_| Error::InvalidCredential("unknown role claim".to_string()))?;

        Ok(TokenIdentity {
            id,
            role,
            firstname: claims.firstname,
            lastname: claims.lastname,
            office: claims.office,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| Error::InvalidCredential("timestamp out of range".to_string()))
}
