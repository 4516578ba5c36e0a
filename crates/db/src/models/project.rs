//! Project entity model and DTOs.

use folio_core::links::LinkInput;
use folio_core::translation::Translations;
use folio_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::status::{ProjectStatus, StatusId};

/// A project row from the `projects` table.
///
/// `title`, `slug` and `description` hold every locale; resolve them for a
/// request before handing them to a client.
#[derive(Debug, Clone, FromRow)]
pub struct Project {
    pub id: DbId,
    pub title: Json<Translations>,
    pub slug: Json<Translations>,
    pub description: Json<Translations>,
    pub category_id: DbId,
    pub image: Option<String>,
    pub status: StatusId,
    pub active: bool,
    pub order: i32,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Typed status. Rows always hold a valid id (CHECK constraint).
    pub fn status(&self) -> ProjectStatus {
        ProjectStatus::from_id(self.status).unwrap_or_default()
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// DTO for creating a new project.
///
/// `image` is the already-resolved storage path. The slug is not part of
/// the input; it is derived from `title` when the row is written.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: Translations,
    pub description: Translations,
    pub category_id: DbId,
    pub image: Option<String>,
    pub status: ProjectStatus,
    pub active: bool,
    pub order: i32,
    /// Replaces all links when present.
    pub links: Option<Vec<LinkInput>>,
    /// Replaces the tag set when present.
    pub tag_ids: Option<Vec<DbId>>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    /// Locales to overlay onto the stored title.
    pub title: Option<Translations>,
    /// Locales to overlay onto the stored description.
    pub description: Option<Translations>,
    pub category_id: Option<DbId>,
    /// `Some(None)` clears the image, `None` leaves it untouched.
    pub image: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub active: Option<bool>,
    pub order: Option<i32>,
    pub links: Option<Vec<LinkInput>>,
    pub tag_ids: Option<Vec<DbId>>,
}

/// Query filters for `GET /projects`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub category_id: Option<DbId>,
    pub status: Option<ProjectStatus>,
    pub active: Option<bool>,
    pub tag_id: Option<DbId>,
}
