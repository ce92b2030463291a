use time::OffsetDateTime;

pub type UserId = u64;

/// Outstanding password reset code for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetCode {
    pub code: String,
    pub expires_at: OffsetDateTime,
}

impl ResetCode {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

/// User record held by the credential store.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,                           // sequential, never reused
    pub email: String,                        // normalized
    pub password_hash: String,                // argon2 digest
    pub name_first: String,
    pub name_last: String,
    pub handle: String,                       // unique
    pub active_session_token: Option<String>, // latest still-valid token
    pub reset_code: Option<ResetCode>,
}

/// Fields supplied at registration; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name_first: String,
    pub name_last: String,
    pub handle: String,
}
