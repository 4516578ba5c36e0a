//! Repository for the `links` table.

use folio_core::links::LinkInput;
use folio_core::types::DbId;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::models::link::Link;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, url, icon, created_at, updated_at";

/// Provides replace/list operations for project links.
pub struct LinkRepo;

impl LinkRepo {
    /// Replace every link of a project with `links`, in submission order.
    ///
    /// An empty slice leaves the project with no links.
    pub async fn replace_for_project(
        conn: &mut PgConnection,
        project_id: DbId,
        links: &[LinkInput],
    ) -> Result<Vec<Link>, sqlx::Error> {
        sqlx::query("DELETE FROM links WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *conn)
            .await?;

        if links.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO links (project_id, title, url, icon) ");
        qb.push_values(links, |mut row, link| {
            row.push_bind(project_id)
                .push_bind(link.title.clone())
                .push_bind(link.url.clone())
                .push_bind(link.icon.clone());
        });
        qb.push(format!(" RETURNING {COLUMNS}"));

        qb.build_query_as::<Link>().fetch_all(&mut *conn).await
    }

    /// List the links of several projects at once, grouped by project.
    pub async fn list_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<Link>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM links WHERE project_id = ANY($1) ORDER BY project_id, id"
        );
        sqlx::query_as::<_, Link>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }
}
