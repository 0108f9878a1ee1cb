use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::api::handlers::{self, health, medical::MEDICAL_BODY_LIMIT};
use crate::api::middleware::require_session;
use crate::api::security::configure_security;
use crate::api::state::AppState;
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // Routes that need a stored API secret
    let api_routes = Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/chart", get(handlers::get_chart))
        // Specific history route before the parametrized ones
        .route("/history/years", get(handlers::get_history_years))
        .route("/history", get(handlers::get_history))
        .route("/readings", post(handlers::create_reading))
        .route(
            "/readings/:id",
            put(handlers::update_reading).delete(handlers::delete_reading),
        )
        .route(
            "/medical",
            get(handlers::list_medical_records)
                .post(handlers::create_medical_record)
                .layer(DefaultBodyLimit::max(MEDICAL_BODY_LIMIT)),
        )
        .route("/medical/:id", delete(handlers::delete_medical_record))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/session", get(handlers::session));

    debug!("Public routes configured");

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(state)
        .merge(configure_swagger_routes())
        .layer(TraceLayer::new_for_http());

    debug!("Swagger UI merged");

    let app = configure_security(app);
    debug!("Security configuration applied");

    health::initialize_server_start_time();

    app
}
