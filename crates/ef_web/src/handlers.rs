use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::AppState;

pub async fn feed_json(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.feed().await)
}
