//! HTTP surface.
//!
//! ## Endpoints
//!
//! - `GET /` - Form with one dropdown entry per demo row
//! - `POST /` - Run the model on the selected row (`demo_index` form field)
//! - `GET /health` - `{"status": "ok", "items": <rows>, "features": <features>}`

pub mod handlers;
pub mod render;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::state::AppContext;

/// Application context shared across handlers.
pub type SharedContext = Arc<AppContext>;

pub fn create_router(ctx: SharedContext) -> Router {
    Router::new()
        .route("/", get(handlers::home).post(handlers::predict))
        .route("/health", get(handlers::health))
        .with_state(ctx)
}
