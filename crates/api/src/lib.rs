//! Reupholstery simulation API server library.
//!
//! Exposes config, state, error handling, routes and the upload store so
//! integration tests and the binary entrypoint share the same pieces.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod uploads;
