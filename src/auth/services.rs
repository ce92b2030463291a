//! Registration, login and logout.
//!
//! `AuthService` owns the credential store and the session manager behind a
//! single `RwLock`. Registration holds the write lock from its first
//! uniqueness check to its last write, so it is all-or-nothing and ids,
//! emails and handles stay unique. Login verifies the password on a blocking
//! thread without holding the lock and only takes the write lock to issue the
//! token.

use std::sync::Arc;

use time::Duration as TimeDuration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LogoutResponse, PublicUser},
        errors::AuthError,
        jwt::JwtKeys,
        notifier::ResetNotifier,
        password::{digest_password, password_matches},
        repo::UserStore,
        repo_types::{NewUser, UserId},
        session::{Invalidation, SessionManager},
        validation::{is_valid_email, is_valid_name, is_valid_password},
    },
    config::AppConfig,
};

pub struct AuthStore {
    pub users: UserStore,
    pub sessions: SessionManager,
}

#[derive(Clone)]
pub struct AuthService {
    pub(super) store: Arc<RwLock<AuthStore>>,
    pub(super) notifier: Arc<dyn ResetNotifier>,
    pub(super) reset_code_ttl: TimeDuration,
}

pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    /// A service over a fresh, empty store.
    pub fn new(config: &AppConfig, notifier: Arc<dyn ResetNotifier>) -> Self {
        let store = AuthStore {
            users: UserStore::new(),
            sessions: SessionManager::new(JwtKeys::from_config(&config.jwt)),
        };
        Self {
            store: Arc::new(RwLock::new(store)),
            notifier,
            reset_code_ttl: TimeDuration::minutes(config.reset.code_ttl_minutes),
        }
    }

    #[instrument(skip_all, fields(email = %email))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name_first: &str,
        name_last: &str,
    ) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            warn!("invalid email");
            return Err(AuthError::InvalidEmail);
        }

        let mut store = self.store.write().await;
        let AuthStore { users, sessions } = &mut *store;

        if users.email_in_use(&email) {
            warn!("email already registered");
            return Err(AuthError::EmailInUse(email));
        }
        if !is_valid_password(password) {
            warn!("password too short");
            return Err(AuthError::PasswordTooShort);
        }
        if !is_valid_name(name_first) {
            return Err(AuthError::InvalidFirstName);
        }
        if !is_valid_name(name_last) {
            return Err(AuthError::InvalidLastName);
        }

        let password_hash = digest_password(password)?;
        let handle = users.generate_unique_handle(name_first, name_last);
        let id = users
            .insert(NewUser {
                email,
                password_hash,
                name_first: name_first.to_string(),
                name_last: name_last.to_string(),
                handle,
            })?
            .id;

        let token = sessions.issue_token(users.get_mut(id)?)?;
        info!(user_id = %id, users = users.len(), "user registered");
        Ok(AuthResponse { u_id: id, token })
    }

    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            warn!("invalid email");
            return Err(AuthError::InvalidEmail);
        }

        let (id, digest) = {
            let store = self.store.read().await;
            let Some(user) = store.users.find_by_email(&email) else {
                warn!("login unknown email");
                return Err(AuthError::EmailNotRegistered(email));
            };
            (user.id, user.password_hash.clone())
        };

        let plain = password.to_string();
        let stored = digest.clone();
        let matches = tokio::task::spawn_blocking(move || password_matches(&plain, &stored))
            .await
            .map_err(anyhow::Error::from)??;
        if !matches {
            warn!(user_id = %id, "login invalid password");
            return Err(AuthError::IncorrectPassword);
        }

        let mut store = self.store.write().await;
        let AuthStore { users, sessions } = &mut *store;
        let user = users.get_mut(id)?;
        // a reset may have replaced the digest while it was being checked
        if user.password_hash != digest {
            warn!(user_id = %id, "password changed during login");
            return Err(AuthError::IncorrectPassword);
        }

        let token = sessions.issue_token(user)?;
        info!(user_id = %id, sessions = sessions.active_sessions(id), "user logged in");
        Ok(AuthResponse { u_id: id, token })
    }

    /// A known token that is already logged out yields `is_success: false`;
    /// a token that was never issued is an access error.
    #[instrument(skip_all)]
    pub async fn logout(&self, token: &str) -> Result<LogoutResponse, AuthError> {
        let mut store = self.store.write().await;
        let AuthStore { users, sessions } = &mut *store;

        let (user_id, outcome) = sessions.invalidate_token(token)?;
        match outcome {
            Invalidation::Revoked => {
                let user = users.get_mut(user_id)?;
                if user.active_session_token.as_deref() == Some(token) {
                    user.active_session_token = None;
                }
                info!(user_id = %user_id, "user logged out");
                Ok(LogoutResponse { is_success: true })
            }
            Invalidation::AlreadyRevoked => {
                debug!(user_id = %user_id, "token already logged out");
                Ok(LogoutResponse { is_success: false })
            }
        }
    }

    pub async fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        let store = self.store.read().await;
        let user_id = store.sessions.authenticate(token)?;
        store.users.find_by_id(user_id).map_err(|e| {
            warn!(error = %e, "session bound to missing user");
            AuthError::InvalidToken
        })?;
        Ok(user_id)
    }

    pub async fn profile(&self, user_id: UserId) -> Result<PublicUser, AuthError> {
        let store = self.store.read().await;
        let user = store.users.find_by_id(user_id).map_err(|e| {
            warn!(error = %e, "profile requested for missing user");
            AuthError::InvalidToken
        })?;
        Ok(PublicUser::from(user))
    }
}

#[cfg(test)]
impl AuthService {
    pub(crate) async fn user_snapshot(&self, id: UserId) -> crate::auth::repo_types::User {
        self.store
            .read()
            .await
            .users
            .find_by_id(id)
            .expect("user exists")
            .clone()
    }

    pub(crate) async fn user_count(&self) -> usize {
        self.store.read().await.users.len()
    }

    pub(crate) async fn active_sessions(&self, id: UserId) -> usize {
        self.store.read().await.sessions.active_sessions(id)
    }
}

#[cfg(test)]
pub(crate) fn test_service() -> AuthService {
    AuthService::new(
        &AppConfig::for_tests(),
        Arc::new(crate::auth::notifier::LogNotifier),
    )
}
