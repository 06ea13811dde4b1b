//! HTTP API.
//!
//! Exposes the conversation engine as JSON endpoints:
//! - `POST /message` — run a patient message through the dispatcher
//! - `GET /appointments` — every appointment booked since startup
//! - `GET /health` — liveness check
//!
//! `api_router()` returns a `Router` that can be mounted on any axum
//! server instance; `server` owns the listener lifecycle.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{ServerError, ServerHandle, ServerInfo};
pub use types::ApiContext;
