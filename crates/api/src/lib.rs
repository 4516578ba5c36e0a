//! Folio API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! admin panel) so integration tests and the binary entrypoint can both
//! access them.

pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod request;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
