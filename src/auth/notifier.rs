use async_trait::async_trait;
use tracing::{debug, info};

/// Delivers password reset codes to users.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn send_reset_notification(&self, email: &str, code: &str) -> anyhow::Result<()>;
}

/// Development notifier: writes the code to the log instead of sending mail.
#[derive(Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl ResetNotifier for LogNotifier {
    async fn send_reset_notification(&self, email: &str, code: &str) -> anyhow::Result<()> {
        info!(email = %email, "password reset code dispatched");
        debug!(email = %email, code = %code, "password reset code");
        Ok(())
    }
}
