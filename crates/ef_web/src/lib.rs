use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/feed.json", get(handlers::feed_json))
        .layer(cors)
        .with_state(state)
}

pub mod prelude {
    pub use crate::AppState;
    pub use ef_core::{ArticleRecord, Error, Result};
}
