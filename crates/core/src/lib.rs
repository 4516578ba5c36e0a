//! Domain logic for the Folio portfolio backend.
//!
//! Everything in here is free of database and HTTP concerns so the
//! repository layer, the API server and tests can share it.

pub mod alert;
pub mod error;
pub mod hashing;
pub mod image;
pub mod lifecycle;
pub mod links;
pub mod roles;
pub mod slug;
pub mod storage;
pub mod translation;
pub mod types;
