//! Repository for the `tags` table and the `project_tag` pivot.

use folio_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::tag::{CreateTag, ProjectTagRow, Tag, UpdateTag};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, color, deleted_at, created_at, updated_at";

/// Same columns qualified for joins through `project_tag`.
const JOINED_COLUMNS: &str =
    "t.id, t.title, t.color, t.deleted_at, t.created_at, t.updated_at";

/// Provides CRUD operations for tags and their project associations.
pub struct TagRepo;

impl TagRepo {
    /// Insert a new tag, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (title, color)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(Json(&input.title))
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Find a tag by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all live tags ordered by ID.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE deleted_at IS NULL ORDER BY id");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Update a tag. Title locales are overlaid onto the stored ones.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTag,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET
                title = COALESCE(title || $2, title),
                color = COALESCE($3, color)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(input.title.as_ref().map(Json))
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a tag. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tags SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// True if a live tag other than `except` already uses `title` in any locale.
    pub async fn title_taken(
        pool: &PgPool,
        title: &str,
        except: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM tags t, jsonb_each_text(t.title) AS tr(locale, value)
                WHERE t.deleted_at IS NULL
                  AND tr.value = $1
                  AND ($2::BIGINT IS NULL OR t.id <> $2)
             )",
        )
        .bind(title)
        .bind(except)
        .fetch_one(pool)
        .await
    }

    /// The subset of `ids` that name live tags.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM tags WHERE id = ANY($1) AND deleted_at IS NULL ORDER BY id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Associate a tag with a project.
    ///
    /// Returns `false` if the pair was already associated; the unique
    /// constraint on the pivot keeps a second row from being written.
    pub async fn attach(pool: &PgPool, project_id: DbId, tag_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO project_tag (project_id, tag_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_project_tag_pair DO NOTHING",
        )
        .bind(project_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a tag from a project. Returns `true` if an association was removed.
    pub async fn detach(pool: &PgPool, project_id: DbId, tag_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_tag WHERE project_id = $1 AND tag_id = $2")
            .bind(project_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check the pivot table for a live tag association.
    pub async fn has_tag(pool: &PgPool, project_id: DbId, tag_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM project_tag pt
                JOIN tags t ON t.id = pt.tag_id
                WHERE pt.project_id = $1 AND pt.tag_id = $2 AND t.deleted_at IS NULL
             )",
        )
        .bind(project_id)
        .bind(tag_id)
        .fetch_one(pool)
        .await
    }

    /// Live tags associated with a project, ordered by tag ID.
    pub async fn tags_for_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM tags t
             JOIN project_tag pt ON pt.tag_id = t.id
             WHERE pt.project_id = $1 AND t.deleted_at IS NULL
             ORDER BY t.id"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Live tags for several projects at once, each row carrying its project id.
    pub async fn tags_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<ProjectTagRow>, sqlx::Error> {
        let query = format!(
            "SELECT pt.project_id, {JOINED_COLUMNS} FROM tags t
             JOIN project_tag pt ON pt.tag_id = t.id
             WHERE pt.project_id = ANY($1) AND t.deleted_at IS NULL
             ORDER BY pt.project_id, t.id"
        );
        sqlx::query_as::<_, ProjectTagRow>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    /// Make `tag_ids` the exact tag set of a project.
    pub async fn sync_project_tags(
        conn: &mut PgConnection,
        project_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_tag WHERE project_id = $1 AND NOT (tag_id = ANY($2))")
            .bind(project_id)
            .bind(tag_ids)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            "INSERT INTO project_tag (project_id, tag_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT ON CONSTRAINT uq_project_tag_pair DO NOTHING",
        )
        .bind(project_id)
        .bind(tag_ids)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

/// The tag relation of one project, possibly already loaded.
///
/// `has_tag` answers from the loaded set when there is one and falls back
/// to the pivot table otherwise.
#[derive(Debug, Clone)]
pub struct ProjectTags {
    project_id: DbId,
    loaded: Option<Vec<Tag>>,
}

impl ProjectTags {
    /// A relation that has not been fetched.
    pub fn unloaded(project_id: DbId) -> Self {
        Self {
            project_id,
            loaded: None,
        }
    }

    /// A relation built from tags fetched elsewhere (e.g. an eager load).
    pub fn loaded(project_id: DbId, tags: Vec<Tag>) -> Self {
        Self {
            project_id,
            loaded: Some(tags),
        }
    }

    /// Fetch the relation.
    pub async fn load(pool: &PgPool, project_id: DbId) -> Result<Self, sqlx::Error> {
        let tags = TagRepo::tags_for_project(pool, project_id).await?;
        Ok(Self::loaded(project_id, tags))
    }

    pub async fn has_tag(&self, pool: &PgPool, tag_id: DbId) -> Result<bool, sqlx::Error> {
        match &self.loaded {
            Some(tags) => Ok(tags.iter().any(|t| t.id == tag_id)),
            None => TagRepo::has_tag(pool, self.project_id, tag_id).await,
        }
    }
}
