//! Link entity model.
//!
//! Links have no create/update DTOs of their own: they are only ever
//! written as a full replacement set from
//! [`folio_core::links::LinkInput`]s.

use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `links` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Link {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
