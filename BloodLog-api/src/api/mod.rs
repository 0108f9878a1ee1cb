pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod state;

use axum::Router;

pub use state::AppState;

/// Create the application router
pub fn create_application(state: AppState) -> Router {
    routes::create_app(state)
}
