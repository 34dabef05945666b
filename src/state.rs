use crate::handler::ContactHandler;
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    contact_handler: Arc<ContactHandler>,
}

impl AppState {
    pub fn create(contact_handler: Arc<ContactHandler>) -> Self {
        Self { contact_handler }
    }
}

impl FromRef<AppState> for Arc<ContactHandler> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.contact_handler.clone()
    }
}
