//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must join a
//! caller's transaction take `&mut PgConnection` instead.

pub mod category_repo;
pub mod link_repo;
pub mod photo_repo;
pub mod project_repo;
pub mod tag_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use link_repo::LinkRepo;
pub use photo_repo::PhotoRepo;
pub use project_repo::ProjectRepo;
pub use tag_repo::{ProjectTags, TagRepo};
pub use user_repo::UserRepo;
