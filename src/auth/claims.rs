use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,      // user ID
    pub email: String, // user email
    pub jti: Uuid,     // token ID, used for revocation
    pub iat: i64,      // issued at (unix timestamp)
    pub exp: i64,      // expires at (unix timestamp)
    pub iss: String,   // issuer
    pub aud: String,   // audience
}

/// Authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub jti: Uuid,
    pub expires_at: OffsetDateTime,
}

impl TryFrom<Claims> for Principal {
    type Error = time::error::ComponentRange;

    fn try_from(c: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: c.sub,
            email: c.email,
            jti: c.jti,
            expires_at: OffsetDateTime::from_unix_timestamp(c.exp)?,
        })
    }
}
