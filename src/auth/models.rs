use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // trainer user id
    pub email: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

/// The authenticated trainer. Passed explicitly into every service and store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerSession {
    pub user_id: Uuid,
    pub email: String,
}

impl TrainerSession {
    pub fn from_claims(claims: &Claims) -> Result<Self, uuid::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            email: claims.email.clone(),
        })
    }
}
