// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use tower_http::trace::TraceLayer;
use serde_json::json;

use crate::{
    handler::{
        admin::{admin_booking_handler, admin_handler},
        auth::auth_handler,
        bookings::bookings_handler,
        payments::payments_handler,
        wallet::wallet_handler,
        workers::workers_handler,
    },
    middleware::{auth, rate_limit, require_admin_key},
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let otp_limiter = Arc::new(rate_limit::auth_rate_limiter());

    let auth_routes = auth_handler().layer(middleware::from_fn_with_state(
        otp_limiter,
        rate_limit::rate_limit_middleware,
    ));

    // Customer/worker booking surface behind JWT auth; the admin mutations on
    // the same path prefix are gated by the admin key instead.
    let booking_routes = bookings_handler()
        .layer(middleware::from_fn(auth))
        .merge(admin_booking_handler().layer(middleware::from_fn(require_admin_key)));

    let api_route = Router::new()
        .nest("/auth", auth_routes)
        .nest("/bookings", booking_routes)
        .nest("/wallet", wallet_handler().layer(middleware::from_fn(auth)))
        .nest("/payments", payments_handler().layer(middleware::from_fn(auth)))
        .nest("/workers", workers_handler().layer(middleware::from_fn(auth)))
        .nest("/admin", admin_handler().layer(middleware::from_fn(require_admin_key)))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
