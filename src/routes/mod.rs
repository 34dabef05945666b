use crate::state::AppState;
use axum::Router;

pub mod docs;
pub mod health;
pub mod send_email;

pub fn build_router(app_state: &AppState) -> Router {
    Router::new()
        .merge(health::create_router())
        .nest("/docs", docs::create_router())
        .merge(send_email::create_router().with_state(app_state.clone()))
}
