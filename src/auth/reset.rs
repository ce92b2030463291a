use std::sync::Arc;

use rand::Rng;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn, Instrument};

use crate::auth::{
    errors::AuthError,
    password::digest_password,
    repo::UserStore,
    repo_types::ResetCode,
    services::{normalize_email, AuthService, AuthStore},
    validation::{is_valid_email, is_valid_password, is_valid_reset_code},
};

/// Six random digits not currently held by any user.
fn generate_reset_code(users: &UserStore) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let code = format!("{:06}", rng.gen_range(0..1_000_000u32));
        if !users.reset_code_in_use(&code) {
            return code;
        }
    }
}

impl AuthService {
    /// Issue a reset code for a registered email and revoke the user's sessions.
    ///
    /// An unregistered email succeeds without doing anything, so callers
    /// cannot probe which addresses have accounts. The code is delivered in
    /// the background; delivery failures are logged and the stored code
    /// stays valid.
    #[instrument(skip_all)]
    pub async fn request_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            warn!("invalid email");
            return Err(AuthError::InvalidEmail);
        }

        let code = {
            let mut store = self.store.write().await;
            let AuthStore { users, sessions } = &mut *store;

            let Some(id) = users.find_by_email(&email).map(|u| u.id) else {
                debug!("password reset requested for unregistered email");
                return Ok(());
            };

            let code = generate_reset_code(users);
            let user = users.get_mut(id)?;
            user.reset_code = Some(ResetCode {
                code: code.clone(),
                expires_at: OffsetDateTime::now_utc() + self.reset_code_ttl,
            });
            user.active_session_token = None;
            let revoked = sessions.revoke_all_for_user(id);
            info!(user_id = %id, revoked, "password reset code issued");
            code
        };

        self.dispatch_reset_notification(email, code);
        Ok(())
    }

    // Delivery runs on its own task; the caller never waits for it.
    fn dispatch_reset_notification(&self, email: String, code: String) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(
            async move {
                if let Err(e) = notifier.send_reset_notification(&email, &code).await {
                    warn!(error = %e, "reset notification failed");
                }
            }
            .in_current_span(),
        );
    }

    /// Consume a reset code and set a new password.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        reset_code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if !is_valid_reset_code(reset_code) {
            warn!("malformed reset code");
            return Err(AuthError::MalformedResetCode);
        }

        let mut store = self.store.write().await;
        let AuthStore { users, sessions } = &mut *store;

        let Some(user) = users.find_by_reset_code(reset_code) else {
            warn!("unknown reset code");
            return Err(AuthError::WrongResetCode);
        };
        let id = user.id;
        let expired = user
            .reset_code
            .as_ref()
            .is_some_and(|r| r.is_expired(OffsetDateTime::now_utc()));
        if expired {
            warn!(user_id = %id, "expired reset code");
            return Err(AuthError::ExpiredResetCode);
        }
        if !is_valid_password(new_password) {
            warn!(user_id = %id, "new password too short");
            return Err(AuthError::PasswordTooShort);
        }

        let password_hash = digest_password(new_password)?;
        let user = users.get_mut(id)?;
        user.password_hash = password_hash;
        user.reset_code = None;
        user.active_session_token = None;
        sessions.revoke_all_for_user(id);
        info!(user_id = %id, "password reset");
        Ok(())
    }
}
