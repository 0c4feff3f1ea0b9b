//! HTTP surface: thin handlers delegating to the service layer.

use axum::Router;

use crate::state::SharedState;

/// Authenticated caller identity extraction.
pub mod auth;
/// Swagger UI routes.
pub mod docs;
/// Game lobby and turn operation routes.
pub mod game;
/// Health check routes.
pub mod health;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router().merge(game::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
