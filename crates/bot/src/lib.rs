//! Threadlock bot server library.
//!
//! Exposes the building blocks (configuration, shared state, error handling,
//! routes, lock services, background tasks) so both the binary entrypoint and
//! the integration tests can assemble the same application.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod locks;
pub mod middleware;
pub mod routes;
pub mod state;
