// HTTP adapter - axum routes over the core services.
//
// Handlers stay thin: parse the request, call a service, map the result.
// Nothing in here knows which store is behind the services.

#[path = "routes/route_catalog.rs"]
pub mod routes;

pub mod auth;
pub mod error;
pub mod state;

pub use auth::SessionVerifier;
pub use routes::router;
pub use state::{AppState, SharedStore};
