//! Route definitions for the `/projects` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Largest multipart body accepted by the photo upload route.
pub const MAX_PHOTO_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /trashed                   -> list_trashed
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// PUT    /{id}/restore              -> restore
/// PUT    /{id}/delete-permanently   -> delete_permanently
/// POST   /{id}/photos               -> add_photos
/// GET    /{id}/tags/{tag_id}        -> has_tag
/// PUT    /{id}/tags/{tag_id}        -> attach_tag
/// DELETE /{id}/tags/{tag_id}        -> detach_tag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/trashed", get(project::list_trashed))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/restore", put(project::restore))
        .route("/{id}/delete-permanently", put(project::delete_permanently))
        .route(
            "/{id}/photos",
            post(project::add_photos).layer(DefaultBodyLimit::max(MAX_PHOTO_UPLOAD_BYTES)),
        )
        .route(
            "/{id}/tags/{tag_id}",
            get(project::has_tag)
                .put(project::attach_tag)
                .delete(project::detach_tag),
        )
}
