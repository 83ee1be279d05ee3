//! HTTP API server for ClipScout.
//!
//! Exposes the discovery and resolution pipeline to the presentation layer
//! as three single-call, response-or-typed-error endpoints. All domain
//! logic lives in `clipscout-discovery` and `clipscout-media`; this crate
//! only translates HTTP to domain calls and errors to status codes.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
