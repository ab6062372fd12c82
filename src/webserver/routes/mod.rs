use axum::Router;
use std::sync::Arc;

use crate::webserver::state::AppState;

pub mod system;
pub mod ws;

/// All relay routes: `/ws`, `/shutdown`, `/status`
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(ws::routes())
        .merge(system::routes())
        .with_state(state)
}
