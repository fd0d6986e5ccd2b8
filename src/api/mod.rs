// src/api/mod.rs
//! HTTP surface: the editor page, the submission dispatcher and health check,
//! plus the shared `AppState` holding the workspace, engine and refactor pipeline.
pub mod routes;
pub mod handlers;
pub mod state;

pub use routes::configure_routes;
pub use state::AppState;
