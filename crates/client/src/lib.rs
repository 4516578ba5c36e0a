//! Typed HTTP client for the folio category API.
//!
//! [`CategoryStore`] keeps the last fetched categories in memory and wraps
//! the REST calls an admin UI issues against `/api/categories`.

pub mod error;
pub mod models;
pub mod store;

pub use error::ClientError;
pub use store::CategoryStore;
