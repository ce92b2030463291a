use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{
    notifier::{LogNotifier, ResetNotifier},
    services::AuthService,
};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let notifier = Arc::new(LogNotifier) as Arc<dyn ResetNotifier>;
        Ok(Self::from_parts(&config, notifier))
    }

    pub fn from_parts(config: &AppConfig, notifier: Arc<dyn ResetNotifier>) -> Self {
        Self {
            auth: AuthService::new(config, notifier),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::from_parts(&AppConfig::for_tests(), Arc::new(LogNotifier))
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
