//! Session token lifecycle.
//!
//! Tokens are signed JWTs bound to a user id. The manager also keeps every
//! issued token in a side table until it expires, so a revoked token can be
//! told apart from one that was never issued.

use std::collections::HashMap;

use time::OffsetDateTime;
use tracing::{debug, warn};

use super::{
    errors::AuthError,
    jwt::JwtKeys,
    repo_types::{User, UserId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Revoked,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    user_id: UserId,
    state: SessionState,
    expires_at: usize,
}

/// Result of invalidating a known token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    Revoked,
    AlreadyRevoked,
}

pub struct SessionManager {
    keys: JwtKeys,
    sessions: HashMap<String, SessionEntry>,
}

impl SessionManager {
    pub fn new(keys: JwtKeys) -> Self {
        Self {
            keys,
            sessions: HashMap::new(),
        }
    }

    /// Issue a token for `user` and record it as the user's active session.
    pub fn issue_token(&mut self, user: &mut User) -> Result<String, AuthError> {
        self.prune_expired(now_unix());
        let (token, claims) = self.keys.sign(user.id)?;
        self.sessions.insert(
            token.clone(),
            SessionEntry {
                user_id: user.id,
                state: SessionState::Active,
                expires_at: claims.exp,
            },
        );
        user.active_session_token = Some(token.clone());
        debug!(user_id = %user.id, "session opened");
        Ok(token)
    }

    /// Resolve an active token to its user id.
    pub fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        let user_id = self.verified_user(token)?;
        match self.sessions.get(token) {
            Some(entry) if entry.state == SessionState::Active => Ok(user_id),
            Some(_) => {
                debug!(user_id = %user_id, "revoked session token presented");
                Err(AuthError::InvalidToken)
            }
            None => {
                warn!(user_id = %user_id, "validly signed but unknown session token");
                Err(AuthError::InvalidToken)
            }
        }
    }

    /// Revoke a token. Unknown, malformed or expired tokens are access errors;
    /// a known token that was already revoked is reported, not rejected.
    pub fn invalidate_token(&mut self, token: &str) -> Result<(UserId, Invalidation), AuthError> {
        let user_id = self.verified_user(token)?;
        let entry = self.sessions.get_mut(token).ok_or_else(|| {
            warn!(user_id = %user_id, "logout with unknown session token");
            AuthError::InvalidToken
        })?;
        match entry.state {
            SessionState::Active => {
                entry.state = SessionState::Revoked;
                debug!(user_id = %user_id, "session closed");
                Ok((user_id, Invalidation::Revoked))
            }
            SessionState::Revoked => Ok((user_id, Invalidation::AlreadyRevoked)),
        }
    }

    /// Revoke every active session of `user_id`, returning how many were open.
    pub fn revoke_all_for_user(&mut self, user_id: UserId) -> usize {
        let mut revoked = 0;
        for entry in self.sessions.values_mut() {
            if entry.user_id == user_id && entry.state == SessionState::Active {
                entry.state = SessionState::Revoked;
                revoked += 1;
            }
        }
        if revoked > 0 {
            debug!(user_id = %user_id, revoked, "sessions revoked");
        }
        revoked
    }

    /// Number of active sessions for a user.
    pub fn active_sessions(&self, user_id: UserId) -> usize {
        self.sessions
            .values()
            .filter(|e| e.user_id == user_id && e.state == SessionState::Active)
            .count()
    }

    fn verified_user(&self, token: &str) -> Result<UserId, AuthError> {
        self.keys.verify(token).map(|c| c.sub).map_err(|e| {
            debug!(error = %e, "session token failed verification");
            AuthError::InvalidToken
        })
    }

    // Expired tokens fail signature validation anyway, so their entries can go.
    fn prune_expired(&mut self, now: usize) {
        self.sessions.retain(|_, entry| entry.expires_at > now);
    }
}

fn now_unix() -> usize {
    OffsetDateTime::now_utc().unix_timestamp() as usize
}
