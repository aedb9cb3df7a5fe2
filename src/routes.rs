// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        bookings::bookings_handler,
        listings::listings_handler,
        negotiations::negotiations_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        // browsing is public, creating a listing is gated inside the handler router
        .nest("/listings", listings_handler())
        .nest(
            "/negotiations",
            negotiations_handler()
                .layer(middleware::from_fn(auth))
        )
        .nest(
            "/bookings",
            bookings_handler()
                .layer(middleware::from_fn(auth))
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
