//! Handlers for the `/tags` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::translation::TranslatableInput;
use folio_core::types::{DbId, Timestamp};
use folio_db::models::tag::{CreateTag, Tag, UpdateTag};
use folio_db::repositories::TagRepo;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult, FieldErrors};
use crate::middleware::rbac::RequireAdmin;
use crate::query::Locale;
use crate::request::{field_errors, validate_translatable_title};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /tags` and `PUT /tags/{id}`.
///
/// `active` is accepted for compatibility with older clients and ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TagRequest {
    #[validate(custom(function = "validate_translatable_title"))]
    pub title: Option<TranslatableInput>,
    #[validate(length(
        min = 1,
        max = 191,
        message = "The color must be between 1 and 191 characters."
    ))]
    pub color: Option<String>,
    pub active: Option<bool>,
}

/// A tag with its title resolved for the request locale.
#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    pub id: DbId,
    pub title: Option<String>,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TagResponse {
    pub fn new(tag: Tag, locale: &Locale) -> Self {
        Self {
            id: tag.id,
            title: locale.resolve(&tag.title),
            color: tag.color,
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Tag", id })
}

/// Every locale of a submitted title must be free among live tags.
async fn check_title_unique(
    pool: &PgPool,
    title: &TranslatableInput,
    except: Option<DbId>,
    fields: &mut FieldErrors,
) -> AppResult<()> {
    for text in title.texts() {
        if TagRepo::title_taken(pool, text, except).await? {
            fields.add("title", "The title has already been taken.");
            break;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/tags
pub async fn list(
    State(state): State<AppState>,
    locale: Locale,
) -> AppResult<Json<Vec<TagResponse>>> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(
        tags.into_iter()
            .map(|tag| TagResponse::new(tag, &locale))
            .collect(),
    ))
}

/// GET /api/tags/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    locale: Locale,
) -> AppResult<Json<TagResponse>> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(TagResponse::new(tag, &locale)))
}

/// POST /api/tags
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    locale: Locale,
    Json(input): Json<TagRequest>,
) -> AppResult<(StatusCode, Json<TagResponse>)> {
    let mut fields = field_errors(&input);
    match &input.title {
        Some(title) => check_title_unique(&state.pool, title, None, &mut fields).await?,
        None => fields.add("title", "The title field is required."),
    }
    if input.color.is_none() {
        fields.add("color", "The color field is required.");
    }
    fields.into_result()?;

    let (Some(title), Some(color)) = (input.title, input.color) else {
        return Err(AppError::BadRequest("Tag title and color are required".into()));
    };
    let tag = TagRepo::create(
        &state.pool,
        &CreateTag {
            title: title.into_translations(&locale.requested),
            color,
        },
    )
    .await?;

    tracing::info!(tag_id = tag.id, user_id = admin.user_id, "Tag created");

    Ok((StatusCode::CREATED, Json(TagResponse::new(tag, &locale))))
}

/// PUT /api/tags/{id}
///
/// Title locales are merged into the stored ones.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    locale: Locale,
    Json(input): Json<TagRequest>,
) -> AppResult<Json<TagResponse>> {
    TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut fields = field_errors(&input);
    if let Some(title) = &input.title {
        check_title_unique(&state.pool, title, Some(id), &mut fields).await?;
    }
    fields.into_result()?;

    let changes = UpdateTag {
        title: input
            .title
            .map(|title| title.into_translations(&locale.requested)),
        color: input.color,
    };
    let tag = TagRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(tag_id = id, user_id = admin.user_id, "Tag updated");

    Ok(Json(TagResponse::new(tag, &locale)))
}

/// DELETE /api/tags/{id}
///
/// Soft-deletes the tag. Its project associations are kept but no longer
/// reported.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TagRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(tag_id = id, user_id = admin.user_id, "Tag deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
