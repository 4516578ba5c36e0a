//! Handlers for the `/categories` resource.
//!
//! Listings are paginated and can embed each category's projects with
//! `?include=projects,projects.links,projects.tags,projects.media`.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::category::{
    Category, CategoryListOptions, CategorySort, CreateCategory, UpdateCategory,
};
use folio_db::repositories::{CategoryRepo, ProjectRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult, FieldErrors};
use crate::handlers::project::{present_projects, ProjectResponse, Relations};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{Locale, PageParams};
use crate::request::{FieldRules, FormRequest};
use crate::response::Paginated;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of a category save, shared by the REST routes and the admin panel.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(
        required(message = "The title field is required."),
        length(
            min = 1,
            max = 191,
            message = "The title must be between 1 and 191 characters."
        )
    )]
    pub title: Option<String>,
    pub active: Option<bool>,
}

impl FormRequest for CategoryRequest {
    const RULES: &'static [FieldRules] = &[
        FieldRules {
            field: "title",
            rules: &["required", "string", "min:1", "max:191"],
        },
        FieldRules {
            field: "active",
            rules: &["boolean"],
        },
    ];
}

impl CategoryRequest {
    /// Convert a validated request into the insert DTO.
    pub fn into_create(self) -> CreateCategory {
        CreateCategory {
            title: self.title.unwrap_or_default(),
            active: self.active,
        }
    }

    pub fn into_update(self) -> UpdateCategory {
        UpdateCategory {
            title: self.title,
            active: self.active,
        }
    }
}

/// Query parameters for `GET /categories`.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryListParams {
    pub active: Option<bool>,
    /// Comma-separated relations to embed.
    pub include: Option<String>,
    /// Column name, `-` prefixed for descending order.
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Relations a category listing embeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryIncludes {
    pub projects: bool,
    pub project_relations: Relations,
}

impl CategoryIncludes {
    /// Parse an `include` list. Any `projects.*` entry implies `projects`.
    ///
    /// Returns the first unknown entry on failure.
    pub fn parse(include: &str) -> Result<Self, String> {
        let mut includes = CategoryIncludes::default();
        for entry in include.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry {
                "projects" => {}
                "projects.links" => includes.project_relations.links = true,
                "projects.tags" => includes.project_relations.tags = true,
                "projects.media" => includes.project_relations.media = true,
                other => return Err(other.to_string()),
            }
            includes.projects = true;
        }
        Ok(includes)
    }
}

/// A category, with its projects when requested.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    #[serde(flatten)]
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectResponse>>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/categories
pub async fn list(
    State(state): State<AppState>,
    locale: Locale,
    Query(params): Query<CategoryListParams>,
) -> AppResult<Json<Paginated<CategoryResponse>>> {
    let mut fields = FieldErrors::new();
    let sort = match params.sort.as_deref().filter(|s| !s.is_empty()) {
        None => CategorySort::default(),
        Some(expr) => CategorySort::parse(expr).unwrap_or_else(|| {
            fields.add("sort", format!("Sorting by '{expr}' is not allowed."));
            CategorySort::default()
        }),
    };
    let includes = match params.include.as_deref() {
        None => CategoryIncludes::default(),
        Some(include) => CategoryIncludes::parse(include).unwrap_or_else(|unknown| {
            fields.add("include", format!("Including '{unknown}' is not allowed."));
            CategoryIncludes::default()
        }),
    };
    fields.into_result()?;

    let page = PageParams {
        page: params.page,
        limit: params.limit,
    };
    let options = CategoryListOptions {
        active: params.active,
        sort,
        limit: page.per_page(),
        offset: page.offset(),
    };
    let (categories, total) = CategoryRepo::list(&state.pool, &options).await?;

    let mut projects: HashMap<DbId, Vec<ProjectResponse>> = HashMap::new();
    if includes.projects {
        let ids: Vec<DbId> = categories.iter().map(|c| c.id).collect();
        let rows = ProjectRepo::list_by_categories(&state.pool, &ids).await?;
        for project in
            present_projects(&state.pool, rows, &locale, includes.project_relations).await?
        {
            projects.entry(project.category_id).or_default().push(project);
        }
    }

    let data = categories
        .into_iter()
        .map(|category| {
            let embedded = includes
                .projects
                .then(|| projects.remove(&category.id).unwrap_or_default());
            CategoryResponse {
                category,
                projects: embedded,
            }
        })
        .collect();

    Ok(Json(Paginated {
        data,
        total,
        page: page.page(),
        per_page: page.per_page(),
    }))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Category>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    input.validate()?;
    let category = CategoryRepo::create(&state.pool, &input.into_create()).await?;

    tracing::info!(category_id = category.id, user_id = admin.user_id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<CategoryRequest>,
) -> AppResult<Json<Category>> {
    input.validate()?;
    let category = CategoryRepo::update(&state.pool, id, &input.into_update())
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(category_id = id, user_id = admin.user_id, "Category updated");

    Ok(Json(category))
}

/// DELETE /api/categories/{id}
///
/// Fails with 409 while projects still belong to the category.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CategoryRepo::delete(&state.pool, id).await? {
        tracing::info!(category_id = id, user_id = admin.user_id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
