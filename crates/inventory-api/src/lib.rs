//! Inventory API Service
//!
//! REST surface over the device, category and license collections.
//!
//! Endpoints:
//! - `GET /health`: liveness, no auth
//! - `POST /api/auth/login`: exchange credentials for a bearer token
//! - `/api/devices`, `/api/categories`, `/api/licenses`: list, get, create,
//!   update and delete, all behind `Authorization: Bearer <token>`

pub mod auth;
pub mod config;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use inventory_store::Inventory;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use auth::{AuthUser, Claims, JwtService};
pub use config::Config;
pub use handlers::ApiError;

/// Shared application state
pub struct AppState {
    pub inventory: Inventory,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(inventory: Inventory, jwt: JwtService) -> Self {
        Self { inventory, jwt }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/auth/login", post(handlers::login_handler))
        .route(
            "/api/devices",
            get(handlers::list_devices_handler).post(handlers::create_device_handler),
        )
        .route(
            "/api/devices/{id}",
            get(handlers::get_device_handler)
                .put(handlers::update_device_handler)
                .delete(handlers::delete_device_handler),
        )
        .route(
            "/api/categories",
            get(handlers::list_categories_handler).post(handlers::create_category_handler),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::get_category_handler)
                .put(handlers::update_category_handler)
                .delete(handlers::delete_category_handler),
        )
        .route(
            "/api/licenses",
            get(handlers::list_licenses_handler).post(handlers::create_license_handler),
        )
        .route(
            "/api/licenses/{id}",
            get(handlers::get_license_handler)
                .put(handlers::update_license_handler)
                .delete(handlers::delete_license_handler),
        )
        .with_state(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve a static frontend for every path the API doesn't claim
pub fn serve_static(router: Router, dir: impl AsRef<Path>) -> Router {
    router.fallback_service(ServeDir::new(dir.as_ref()))
}
