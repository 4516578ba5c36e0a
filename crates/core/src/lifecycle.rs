//! Project persistence hooks.
//!
//! The project repository calls these around each write:
//!
//! ```text
//! create  -> creating(draft) -> INSERT
//! update  -> updating(draft) -> UPDATE
//! delete  -> deleting(image) -> soft delete
//! ```
//!
//! Restore and permanent delete run no hooks.

use async_trait::async_trait;

use crate::image::ImageCodec;
use crate::slug::slug_translations;
use crate::translation::Translations;

/// The derived-field state of a project about to be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: Translations,
    pub slug: Translations,
}

impl ProjectDraft {
    pub fn new(title: Translations) -> Self {
        Self {
            title,
            slug: Translations::default(),
        }
    }
}

#[async_trait]
pub trait ProjectHooks: Send + Sync {
    /// Runs before a project row is inserted.
    fn creating(&self, draft: &mut ProjectDraft);

    /// Runs before a project row is updated.
    fn updating(&self, draft: &mut ProjectDraft);

    /// Runs before a project is soft-deleted. Must not fail the deletion.
    async fn deleting(&self, image: Option<&str>);
}

/// Slug derivation on write, image cleanup on delete.
#[derive(Clone)]
pub struct StandardProjectHooks {
    images: ImageCodec,
}

impl StandardProjectHooks {
    pub fn new(images: ImageCodec) -> Self {
        Self { images }
    }
}

#[async_trait]
impl ProjectHooks for StandardProjectHooks {
    fn creating(&self, draft: &mut ProjectDraft) {
        draft.slug = slug_translations(&draft.title);
    }

    fn updating(&self, draft: &mut ProjectDraft) {
        draft.slug = slug_translations(&draft.title);
    }

    async fn deleting(&self, image: Option<&str>) {
        if let Some(path) = image {
            self.images.remove(path).await;
        }
    }
}
