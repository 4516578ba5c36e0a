//! Repository for the `projects` table.
//!
//! Writes run the [`ProjectHooks`] around the statement and replace the
//! project's links and tags in the same transaction when the input carries
//! them.

use folio_core::lifecycle::{ProjectDraft, ProjectHooks};
use folio_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use crate::repositories::{LinkRepo, TagRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, description, category_id, image, status, active, \
                       \"order\", deleted_at, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// The slug is derived by `hooks.creating` before the insert.
    pub async fn create(
        pool: &PgPool,
        hooks: &dyn ProjectHooks,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut draft = ProjectDraft::new(input.title.clone());
        hooks.creating(&mut draft);

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects \
                 (title, slug, description, category_id, image, status, active, \"order\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(Json(&draft.title))
            .bind(Json(&draft.slug))
            .bind(Json(&input.description))
            .bind(input.category_id)
            .bind(&input.image)
            .bind(input.status.id())
            .bind(input.active)
            .bind(input.order)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(links) = &input.links {
            LinkRepo::replace_for_project(&mut tx, project.id, links).await?;
        }
        if let Some(tag_ids) = &input.tag_ids {
            TagRepo::sync_project_tags(&mut tx, project.id, tag_ids).await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List live projects matching `filter`, in display order.
    pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM projects WHERE deleted_at IS NULL"
        ));
        if let Some(category_id) = filter.category_id {
            qb.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.id());
        }
        if let Some(active) = filter.active {
            qb.push(" AND active = ").push_bind(active);
        }
        if let Some(tag_id) = filter.tag_id {
            qb.push(
                " AND EXISTS (SELECT 1 FROM project_tag pt \
                 WHERE pt.project_id = projects.id AND pt.tag_id = ",
            )
            .push_bind(tag_id)
            .push(")");
        }
        qb.push(" ORDER BY \"order\", id");

        qb.build_query_as::<Project>().fetch_all(pool).await
    }

    /// List live projects belonging to any of `category_ids`, in display order.
    pub async fn list_by_categories(
        pool: &PgPool,
        category_ids: &[DbId],
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects \
             WHERE category_id = ANY($1) AND deleted_at IS NULL \
             ORDER BY \"order\", id"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(category_ids)
            .fetch_all(pool)
            .await
    }

    /// List soft-deleted projects, most recently trashed first.
    pub async fn list_trashed(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE deleted_at IS NOT NULL \
             ORDER BY deleted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Title and description locales are merged into the stored ones and the
    /// slug is re-derived by `hooks.updating`. Returns `None` if no live row
    /// with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        hooks: &dyn ProjectHooks,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT {COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        let Some(current) = sqlx::query_as::<_, Project>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut title = current.title.0;
        if let Some(changes) = &input.title {
            title.merge(changes.clone());
        }
        let mut description = current.description.0;
        if let Some(changes) = &input.description {
            description.merge(changes.clone());
        }
        let mut draft = ProjectDraft {
            title,
            slug: current.slug.0,
        };
        hooks.updating(&mut draft);

        let image = match &input.image {
            Some(image) => image.clone(),
            None => current.image,
        };

        let query = format!(
            "UPDATE projects SET \
                 title = $2, \
                 slug = $3, \
                 description = $4, \
                 category_id = COALESCE($5, category_id), \
                 image = $6, \
                 status = COALESCE($7, status), \
                 active = COALESCE($8, active), \
                 \"order\" = COALESCE($9, \"order\") \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(Json(&draft.title))
            .bind(Json(&draft.slug))
            .bind(Json(&description))
            .bind(input.category_id)
            .bind(&image)
            .bind(input.status.map(|s| s.id()))
            .bind(input.active)
            .bind(input.order)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(links) = &input.links {
            LinkRepo::replace_for_project(&mut tx, id, links).await?;
        }
        if let Some(tag_ids) = &input.tag_ids {
            TagRepo::sync_project_tags(&mut tx, id, tag_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Soft-delete a project by ID. Returns `true` if a row was marked deleted.
    ///
    /// `hooks.deleting` removes the stored image first; that removal is
    /// best-effort and never prevents the row from being trashed.
    pub async fn soft_delete(
        pool: &PgPool,
        hooks: &dyn ProjectHooks,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(false);
        };

        hooks.deleting(project.image.as_deref()).await;

        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted project. Returns `true` if a row was restored.
    ///
    /// The stored slug is kept as-is.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a project by ID, live or trashed. Returns `true`
    /// if a row was removed.
    ///
    /// `hooks.deleting` runs for a live project only; a trashed one lost its
    /// image when it was soft-deleted. Links, tag associations and photos go
    /// with the row (`ON DELETE CASCADE`).
    pub async fn hard_delete(
        pool: &PgPool,
        hooks: &dyn ProjectHooks,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let Some(project) = Self::find_by_id_include_deleted(pool, id).await? else {
            return Ok(false);
        };

        if project.deleted_at.is_none() {
            hooks.deleting(project.image.as_deref()).await;
        }

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
