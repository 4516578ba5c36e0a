//! Repository for the `categories` table.

use folio_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::category::{Category, CategoryListOptions, CreateCategory, UpdateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, active, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    ///
    /// If `active` is `None`, defaults to `true`.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (title, active)
             VALUES ($1, COALESCE($2, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.title)
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    /// Find a category by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of categories plus the total number matching the filter.
    pub async fn list(
        pool: &PgPool,
        opts: &CategoryListOptions,
    ) -> Result<(Vec<Category>, i64), sqlx::Error> {
        let mut count: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM categories");
        let mut select: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM categories"));
        if let Some(active) = opts.active {
            count.push(" WHERE active = ").push_bind(active);
            select.push(" WHERE active = ").push_bind(active);
        }

        let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

        select.push(format!(" ORDER BY {}", opts.sort.sql()));
        select.push(" LIMIT ").push_bind(opts.limit);
        select.push(" OFFSET ").push_bind(opts.offset);
        let rows = select.build_query_as::<Category>().fetch_all(pool).await?;

        Ok((rows, total))
    }

    /// Update a category. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                title = COALESCE($2, title),
                active = COALESCE($3, active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign key violation while projects still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
