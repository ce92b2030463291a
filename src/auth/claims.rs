use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::UserId;

/// JWT payload of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId, // user ID
    pub sid: Uuid,   // session ID, unique per issued token
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
