//! HTTP transport: decodes requests, calls the [`WalletService`], encodes
//! responses.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::WalletResponse;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::application::WalletService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WalletService>,
}

impl AppState {
    pub fn new(service: WalletService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/wallets/{id}", get(handlers::get_wallet))
        .route("/wallet", post(handlers::update_wallet));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
