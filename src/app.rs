use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/inventory", post(handlers::register_inventory))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/consumption", get(handlers::get_consumption))
        .route(
            "/api/inventory",
            get(handlers::get_inventory).post(handlers::add_inventory),
        )
        .with_state(state)
}
