//! Project gallery photo model.

use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `project_photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectPhoto {
    pub id: DbId,
    pub project_id: DbId,
    pub path: String,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
