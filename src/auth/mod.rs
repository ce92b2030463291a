use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod errors;
pub(crate) mod extractors;
pub mod handlers;
mod jwt;
pub mod notifier;
pub mod password;
pub mod repo;
pub mod repo_types;
mod reset;
pub mod services;
pub mod session;
pub mod validation;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
