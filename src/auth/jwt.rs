use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims issued by the auth provider.
///
/// The `sub` field is the user's UUID. `user_metadata` carries profile info
/// from the upstream identity provider, when present.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The auth user UUID.
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    /// Issuer.
    pub iss: Option<String>,
    /// User's email.
    pub email: Option<String>,
    /// Provider role (e.g. "authenticated").
    pub role: Option<String>,
    /// Metadata from the identity provider.
    pub user_metadata: Option<UserMetadata>,
}

/// Metadata populated by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    /// Best-effort display name from metadata.
    pub fn display_name(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.full_name.clone().or_else(|| m.name.clone()))
    }

    /// Best-effort email: prefer top-level, fall back to metadata.
    pub fn user_email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| self.user_metadata.as_ref().and_then(|m| m.email.clone()))
    }
}

/// Validate an HS256-signed JWT against the shared secret and return the
/// decoded claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("{:?}", e.kind()))
}
