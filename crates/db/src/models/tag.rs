//! Tag and project-tag pivot models and DTOs.

use folio_core::translation::Translations;
use folio_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub id: DbId,
    pub title: Json<Translations>,
    pub color: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PartialEq for Tag {
    /// Tags are the same tag when their ids match.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// A tag joined through `project_tag`, carrying the owning project id.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectTagRow {
    pub project_id: DbId,
    #[sqlx(flatten)]
    pub tag: Tag,
}

/// DTO for creating a new tag.
#[derive(Debug, Clone)]
pub struct CreateTag {
    pub title: Translations,
    pub color: String,
}

/// DTO for updating a tag. `title` locales are overlaid onto the stored ones.
#[derive(Debug, Clone, Default)]
pub struct UpdateTag {
    pub title: Option<Translations>,
    pub color: Option<String>,
}
