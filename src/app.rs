use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{chart, dashboard, health, prices};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(dashboard::router())
        .nest("/health", health::router())
        .nest("/api/chart", chart::router())
        .nest("/api/prices", prices::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
