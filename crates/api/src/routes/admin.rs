//! Route definitions for the admin panels.
//!
//! Mounted at `/{ADMIN_ROUTE_PREFIX}` at the root, outside `/api`.

use axum::routing::get;
use axum::Router;

use crate::admin::category;
use crate::state::AppState;

/// Routes mounted at `/{prefix}`.
///
/// ```text
/// GET    /category/setup   -> setup
/// GET    /category         -> index
/// POST   /category         -> store
/// GET    /category/{id}    -> show
/// PUT    /category/{id}    -> update
/// DELETE /category/{id}    -> destroy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/category/setup", get(category::setup))
        .route("/category", get(category::index).post(category::store))
        .route(
            "/category/{id}",
            get(category::show)
                .put(category::update)
                .delete(category::destroy),
        )
}
