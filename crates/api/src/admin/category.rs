//! Category admin panel, mounted at `/{prefix}/category`.
//!
//! Saves are validated as [`CategoryRequest`] and persisted through
//! [`CategoryRepo`]. Successful writes carry a `Location` header pointing
//! the UI back at the panel index.

use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::category::{Category, CategoryListOptions};
use folio_db::repositories::CategoryRepo;
use validator::Validate;

use super::{set_required_fields, Column, Field, PanelSetup};
use crate::error::{AppError, AppResult};
use crate::handlers::category::CategoryRequest;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::request::Operation;
use crate::response::{DataResponse, Paginated};
use crate::state::AppState;

/// Path of the panel index for the configured prefix.
fn panel_route(state: &AppState) -> String {
    format!("/{}/category", state.config.admin_route_prefix)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

/// Describe the panel: names, route, index columns and form fields.
pub fn panel_setup(route: String) -> PanelSetup {
    let mut fields = vec![
        Field::new("title", "Title", "text"),
        Field::new("active", "Active", "switch"),
    ];
    set_required_fields::<CategoryRequest>(&mut fields, Operation::Create);
    set_required_fields::<CategoryRequest>(&mut fields, Operation::Edit);

    PanelSetup {
        entity_name: "category",
        entity_name_plural: "categories",
        route,
        columns: vec![
            Column {
                name: "id",
                label: "ID",
                sortable: true,
            },
            Column {
                name: "title",
                label: "Title",
                sortable: true,
            },
            Column {
                name: "active",
                label: "Active",
                sortable: true,
            },
        ],
        fields,
    }
}

/// GET /{prefix}/category/setup
pub async fn setup(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<DataResponse<PanelSetup>>> {
    Ok(Json(DataResponse {
        data: panel_setup(panel_route(&state)),
    }))
}

/// GET /{prefix}/category
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Paginated<Category>>> {
    let options = CategoryListOptions {
        limit: params.per_page(),
        offset: params.offset(),
        ..Default::default()
    };
    let (data, total) = CategoryRepo::list(&state.pool, &options).await?;
    Ok(Json(Paginated {
        data,
        total,
        page: params.page(),
        per_page: params.per_page(),
    }))
}

/// GET /{prefix}/category/{id}
pub async fn show(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /{prefix}/category
pub async fn store(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CategoryRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let category = CategoryRepo::create(&state.pool, &input.into_create()).await?;

    tracing::info!(
        category_id = category.id,
        user_id = admin.user_id,
        "Category stored from admin panel"
    );

    Ok((
        StatusCode::CREATED,
        [(LOCATION, panel_route(&state))],
        Json(DataResponse { data: category }),
    ))
}

/// PUT /{prefix}/category/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<CategoryRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let category = CategoryRepo::update(&state.pool, id, &input.into_update())
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        category_id = id,
        user_id = admin.user_id,
        "Category updated from admin panel"
    );

    Ok((
        StatusCode::OK,
        [(LOCATION, panel_route(&state))],
        Json(DataResponse { data: category }),
    ))
}

/// DELETE /{prefix}/category/{id}
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CategoryRepo::delete(&state.pool, id).await? {
        tracing::info!(
            category_id = id,
            user_id = admin.user_id,
            "Category destroyed from admin panel"
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
