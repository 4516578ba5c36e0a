//! Repository for the `project_photos` table.

use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::photo::ProjectPhoto;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, path, position, created_at, updated_at";

pub struct PhotoRepo;

impl PhotoRepo {
    /// Append a photo to the end of a project's gallery.
    pub async fn add(
        pool: &PgPool,
        project_id: DbId,
        path: &str,
    ) -> Result<ProjectPhoto, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_photos (project_id, path, position)
             VALUES ($1, $2,
                 (SELECT COALESCE(MAX(position) + 1, 0) FROM project_photos WHERE project_id = $1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectPhoto>(&query)
            .bind(project_id)
            .bind(path)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<ProjectPhoto>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_photos WHERE project_id = ANY($1)
             ORDER BY project_id, position, id"
        );
        sqlx::query_as::<_, ProjectPhoto>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }
}
