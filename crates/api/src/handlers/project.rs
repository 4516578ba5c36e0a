//! Handlers for the `/projects` resource.
//!
//! Writes go through [`ProjectRepo`], which runs the project hooks (slug
//! derivation, image cleanup) and replaces links and tags in the same
//! transaction. The cover image is resolved by the image codec before the
//! row is written; codec problems come back as `alerts` on the response.
//!
//! Sub-resources:
//! `/projects/{id}/photos`, `/projects/{id}/tags/{tag_id}`

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::alert::{Alert, AlertBuffer};
use folio_core::error::CoreError;
use folio_core::image::detect_image_extension;
use folio_core::links::parse_links;
use folio_core::translation::TranslatableInput;
use folio_core::types::{DbId, Timestamp};
use folio_db::models::link::Link;
use folio_db::models::photo::ProjectPhoto;
use folio_db::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use folio_db::models::status::ProjectStatus;
use folio_db::repositories::{
    CategoryRepo, LinkRepo, PhotoRepo, ProjectRepo, ProjectTags, TagRepo,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult, FieldErrors};
use crate::handlers::tag::TagResponse;
use crate::middleware::rbac::RequireAdmin;
use crate::query::Locale;
use crate::request::{double_option, field_errors, validate_translatable_title, TagRef};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /projects` and `PUT /projects/{id}`.
///
/// On update every field is optional; absent fields keep their stored
/// value. `image: null` clears the cover image, `links` and `tags` replace
/// the whole set when present.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProjectRequest {
    #[validate(custom(function = "validate_translatable_title"))]
    pub title: Option<TranslatableInput>,
    pub description: Option<TranslatableInput>,
    pub category_id: Option<DbId>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub active: Option<bool>,
    #[validate(range(min = 0, message = "The order must be at least 0."))]
    pub order: Option<i32>,
    /// A JSON array of links or a string encoding one.
    pub links: Option<serde_json::Value>,
    pub tags: Option<Vec<TagRef>>,
}

/// Which relations to load alongside projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relations {
    pub links: bool,
    pub tags: bool,
    /// Gallery photos, serialized as `images`.
    pub media: bool,
}

impl Relations {
    pub const ALL: Relations = Relations {
        links: true,
        tags: true,
        media: true,
    };

    pub const MEDIA: Relations = Relations {
        links: false,
        tags: false,
        media: true,
    };
}

/// A project with its translatable attributes resolved for the request
/// locale.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: DbId,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub category_id: DbId,
    pub description: Option<String>,
    pub image: Option<String>,
    pub order: i32,
    pub status: ProjectStatus,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ProjectPhoto>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagResponse>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<Alert>,
}

impl ProjectResponse {
    pub fn new(project: Project, locale: &Locale) -> Self {
        let status = project.status();
        Self {
            id: project.id,
            title: locale.resolve(&project.title),
            slug: locale.resolve(&project.slug),
            category_id: project.category_id,
            description: locale.resolve(&project.description),
            image: project.image,
            order: project.order,
            status,
            active: project.active,
            images: None,
            created_at: project.created_at,
            updated_at: project.updated_at,
            deleted_at: project.deleted_at,
            links: None,
            tags: None,
            alerts: Vec::new(),
        }
    }
}

fn group_by<T>(rows: Vec<T>, key: impl Fn(&T) -> DbId) -> HashMap<DbId, Vec<T>> {
    let mut grouped: HashMap<DbId, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

/// Build responses for `projects`, batch-loading the requested relations.
pub async fn present_projects(
    pool: &PgPool,
    projects: Vec<Project>,
    locale: &Locale,
    relations: Relations,
) -> AppResult<Vec<ProjectResponse>> {
    let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();

    let mut links = if relations.links {
        group_by(LinkRepo::list_for_projects(pool, &ids).await?, |l| {
            l.project_id
        })
    } else {
        HashMap::new()
    };
    let mut tags = if relations.tags {
        group_by(TagRepo::tags_for_projects(pool, &ids).await?, |r| {
            r.project_id
        })
    } else {
        HashMap::new()
    };
    let mut media = if relations.media {
        group_by(PhotoRepo::list_for_projects(pool, &ids).await?, |p| {
            p.project_id
        })
    } else {
        HashMap::new()
    };

    Ok(projects
        .into_iter()
        .map(|project| {
            let id = project.id;
            let mut response = ProjectResponse::new(project, locale);
            if relations.links {
                response.links = Some(links.remove(&id).unwrap_or_default());
            }
            if relations.tags {
                response.tags = Some(
                    tags.remove(&id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|row| TagResponse::new(row.tag, locale))
                        .collect(),
                );
            }
            if relations.media {
                response.images = Some(media.remove(&id).unwrap_or_default());
            }
            response
        })
        .collect())
}

/// Build the response for a single project with every relation loaded.
async fn present_project(
    pool: &PgPool,
    project: Project,
    locale: &Locale,
) -> AppResult<ProjectResponse> {
    let id = project.id;
    present_projects(pool, vec![project], locale, Relations::ALL)
        .await?
        .pop()
        .ok_or_else(|| not_found(id))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// Distinct tag ids referenced by a save, in ascending order.
fn tag_ids(tags: &[TagRef]) -> Vec<DbId> {
    let mut ids: Vec<DbId> = tags.iter().map(|t| t.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Check the category and tags a save refers to. Returns the tag ids to
/// sync, if the request carries tags.
async fn check_references(
    pool: &PgPool,
    input: &ProjectRequest,
    fields: &mut FieldErrors,
) -> AppResult<Option<Vec<DbId>>> {
    if let Some(category_id) = input.category_id {
        if CategoryRepo::find_by_id(pool, category_id).await?.is_none() {
            fields.add("category_id", "The selected category id is invalid.");
        }
    }

    let Some(tags) = &input.tags else {
        return Ok(None);
    };
    let ids = tag_ids(tags);
    if !ids.is_empty() && TagRepo::existing_ids(pool, &ids).await?.len() != ids.len() {
        fields.add("tags", "The selected tags are invalid.");
    }
    Ok(Some(ids))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/projects
///
/// Live projects in display order, optionally filtered by `category_id`,
/// `status`, `active` and `tag_id`.
pub async fn list(
    State(state): State<AppState>,
    locale: Locale,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<Vec<ProjectResponse>>> {
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    let projects = present_projects(&state.pool, projects, &locale, Relations::MEDIA).await?;
    Ok(Json(projects))
}

/// GET /api/projects/trashed
pub async fn list_trashed(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    locale: Locale,
) -> AppResult<Json<Vec<ProjectResponse>>> {
    let projects = ProjectRepo::list_trashed(&state.pool).await?;
    let projects = present_projects(&state.pool, projects, &locale, Relations::MEDIA).await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    locale: Locale,
) -> AppResult<Json<ProjectResponse>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(present_project(&state.pool, project, &locale).await?))
}

/// POST /api/projects
///
/// `title` and `category_id` are required. The slug is derived from the
/// title; the cover image may be a storage path or a base64 data URI.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    locale: Locale,
    Json(input): Json<ProjectRequest>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    let mut fields = field_errors(&input);
    if input.title.is_none() {
        fields.add("title", "The title field is required.");
    }
    if input.category_id.is_none() {
        fields.add("category_id", "The category id field is required.");
    }
    let tag_ids = check_references(&state.pool, &input, &mut fields).await?;
    fields.into_result()?;

    let (Some(title), Some(category_id)) = (input.title, input.category_id) else {
        return Err(AppError::BadRequest(
            "Project title and category are required".into(),
        ));
    };

    let alerts = AlertBuffer::new();
    let image = state
        .images
        .apply(None, input.image.flatten().as_deref(), &alerts)
        .await;

    let create = CreateProject {
        title: title.into_translations(&locale.requested),
        description: input
            .description
            .map(|d| d.into_translations(&locale.requested))
            .unwrap_or_default(),
        category_id,
        image,
        status: input.status.unwrap_or_default(),
        active: input.active.unwrap_or(true),
        order: input.order.unwrap_or(0),
        links: input.links.as_ref().map(parse_links),
        tag_ids,
    };
    let project = ProjectRepo::create(&state.pool, state.hooks.as_ref(), &create).await?;

    tracing::info!(
        project_id = project.id,
        category_id,
        user_id = admin.user_id,
        "Project created"
    );

    let mut response = present_project(&state.pool, project, &locale).await?;
    response.alerts = alerts.drain();
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/projects/{id}
///
/// Submitted title and description locales are merged into the stored ones
/// and the slug is re-derived.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    locale: Locale,
    Json(input): Json<ProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let current = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut fields = field_errors(&input);
    let tag_ids = check_references(&state.pool, &input, &mut fields).await?;
    fields.into_result()?;

    let alerts = AlertBuffer::new();
    let image = match &input.image {
        Some(value) => Some(
            state
                .images
                .apply(current.image.as_deref(), value.as_deref(), &alerts)
                .await,
        ),
        None => None,
    };

    let changes = UpdateProject {
        title: input
            .title
            .map(|t| t.into_translations(&locale.requested)),
        description: input
            .description
            .map(|d| d.into_translations(&locale.requested)),
        category_id: input.category_id,
        image,
        status: input.status,
        active: input.active,
        order: input.order,
        links: input.links.as_ref().map(parse_links),
        tag_ids,
    };
    let project = ProjectRepo::update(&state.pool, state.hooks.as_ref(), id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(project_id = id, user_id = admin.user_id, "Project updated");

    let mut response = present_project(&state.pool, project, &locale).await?;
    response.alerts = alerts.drain();
    Ok(Json(response))
}

/// DELETE /api/projects/{id}
///
/// Soft-deletes the project and removes its cover image from storage.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProjectRepo::soft_delete(&state.pool, state.hooks.as_ref(), id).await? {
        tracing::info!(project_id = id, user_id = admin.user_id, "Project trashed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// PUT /api/projects/{id}/restore
///
/// Restoring a project that is not trashed is a no-op that still returns it.
pub async fn restore(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    locale: Locale,
) -> AppResult<Json<ProjectResponse>> {
    if ProjectRepo::restore(&state.pool, id).await? {
        tracing::info!(project_id = id, user_id = admin.user_id, "Project restored");
    }
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(present_project(&state.pool, project, &locale).await?))
}

/// PUT /api/projects/{id}/delete-permanently
///
/// Works on live and trashed projects alike; a live project's cover image is
/// removed as on a soft delete.
pub async fn delete_permanently(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProjectRepo::hard_delete(&state.pool, state.hooks.as_ref(), id).await? {
        tracing::info!(project_id = id, user_id = admin.user_id, "Project purged");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Photos sub-resource
// ---------------------------------------------------------------------------

fn is_photo_field(name: &str) -> bool {
    name == "photos" || name == "photos[]" || (name.starts_with("photos[") && name.ends_with(']'))
}

/// POST /api/projects/{id}/photos
///
/// Multipart upload of one or more gallery images under `photos[]`. Every
/// file is checked before any is stored.
pub async fn add_photos(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    locale: Locale,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut fields = FieldErrors::new();
    let mut uploads: Vec<(Vec<u8>, &'static str)> = Vec::new();
    let mut index = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if !field.name().is_some_and(is_photo_field) {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        match detect_image_extension(&data) {
            Ok(extension) => uploads.push((data.to_vec(), extension)),
            Err(_) => fields.add(
                &format!("photos.{index}"),
                format!("The photos.{index} must be an image."),
            ),
        }
        index += 1;
    }
    if index == 0 {
        fields.add("photos", "The photos field is required.");
    }
    fields.into_result()?;

    for (bytes, extension) in &uploads {
        let path = state
            .images
            .store_upload(bytes, extension)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to store photo: {e}")))?;
        PhotoRepo::add(&state.pool, id, &path).await?;
    }

    tracing::info!(
        project_id = id,
        count = uploads.len(),
        user_id = admin.user_id,
        "Project photos added"
    );

    let response = present_project(&state.pool, project, &locale).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

// ---------------------------------------------------------------------------
// Tags sub-resource
// ---------------------------------------------------------------------------

/// PUT /api/projects/{id}/tags/{tag_id}
///
/// Attaching an already attached tag is a no-op.
pub async fn attach_tag(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((id, tag_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    TagRepo::find_by_id(&state.pool, tag_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tag",
            id: tag_id,
        }))?;

    let relation = ProjectTags::load(&state.pool, id).await?;
    if relation.has_tag(&state.pool, tag_id).await? {
        return Ok(StatusCode::NO_CONTENT);
    }

    if TagRepo::attach(&state.pool, id, tag_id).await? {
        tracing::info!(project_id = id, tag_id, user_id = admin.user_id, "Tag attached");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/projects/{id}/tags/{tag_id}
///
/// 204 when the live tag is attached to the project, 404 otherwise.
pub async fn has_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if ProjectTags::unloaded(id).has_tag(&state.pool, tag_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Tag",
            id: tag_id,
        }))
    }
}

/// DELETE /api/projects/{id}/tags/{tag_id}
pub async fn detach_tag(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((id, tag_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if TagRepo::detach(&state.pool, id, tag_id).await? {
        tracing::info!(project_id = id, tag_id, user_id = admin.user_id, "Tag detached");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tag_ids_are_distinct_and_sorted() {
        let refs: Vec<TagRef> = serde_json::from_value(json!([5, {"id": 2}, 5, 1])).unwrap();
        assert_eq!(tag_ids(&refs), vec![1, 2, 5]);
    }

    #[test]
    fn photo_field_names() {
        assert!(is_photo_field("photos"));
        assert!(is_photo_field("photos[]"));
        assert!(is_photo_field("photos[3]"));
        assert!(!is_photo_field("photo"));
        assert!(!is_photo_field("photos_extra"));
    }

    #[test]
    fn request_keeps_null_image_apart_from_missing() {
        let cleared: ProjectRequest = serde_json::from_value(json!({"image": null})).unwrap();
        let untouched: ProjectRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cleared.image, Some(None));
        assert_eq!(untouched.image, None);
    }

    #[test]
    fn request_validation() {
        let input: ProjectRequest =
            serde_json::from_value(json!({"title": "", "order": -1, "status": "open"})).unwrap();
        let fields = field_errors(&input);
        assert!(fields.get("title").is_some());
        assert!(fields.get("order").is_some());
        assert_eq!(input.status, Some(ProjectStatus::Open));
    }
}
