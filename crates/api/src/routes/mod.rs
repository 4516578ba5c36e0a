pub mod admin;
pub mod auth;
pub mod category;
pub mod health;
pub mod project;
pub mod tag;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
///
/// /projects                                        list, create
/// /projects/trashed                                soft-deleted projects (admin)
/// /projects/{id}                                   get, update, soft delete
/// /projects/{id}/restore                           restore (PUT)
/// /projects/{id}/delete-permanently                purge (PUT)
/// /projects/{id}/photos                            gallery upload (multipart POST)
/// /projects/{id}/tags/{tag_id}                     attach (PUT), detach (DELETE)
///
/// /tags                                            list, create
/// /tags/{id}                                       get, update, soft delete
///
/// /categories                                      list (paginated), create
/// /categories/{id}                                 get, update, delete
/// ```
///
/// Reads are public; writes require an admin token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication.
        .nest("/auth", auth::router())
        // Projects and their photo/tag sub-resources.
        .nest("/projects", project::router())
        // Tag CRUD.
        .nest("/tags", tag::router())
        // Category CRUD.
        .nest("/categories", category::router())
}
