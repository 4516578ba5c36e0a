//! Category entity model and DTOs.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub title: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub title: String,
    /// Defaults to `true` if omitted.
    pub active: Option<bool>,
}

/// DTO for updating an existing category. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub title: Option<String>,
    pub active: Option<bool>,
}

/// Sortable category columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySortColumn {
    Id,
    Title,
    Active,
    CreatedAt,
    UpdatedAt,
}

impl CategorySortColumn {
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Active => "active",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    fn from_column(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "active" => Some(Self::Active),
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

/// Ordering for a category listing, parsed from `sort=title` / `sort=-title`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySort {
    pub column: CategorySortColumn,
    pub descending: bool,
}

impl CategorySort {
    /// Parse a sort expression. A leading `-` means descending.
    ///
    /// Returns `None` for unknown columns.
    pub fn parse(expr: &str) -> Option<Self> {
        let (descending, name) = match expr.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, expr),
        };
        CategorySortColumn::from_column(name).map(|column| Self { column, descending })
    }

    pub fn sql(self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("{} {direction}, id {direction}", self.column.column())
    }
}

impl Default for CategorySort {
    fn default() -> Self {
        Self {
            column: CategorySortColumn::Id,
            descending: false,
        }
    }
}

/// Listing options for categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListOptions {
    /// Only categories with this `active` value.
    pub active: Option<bool>,
    pub sort: CategorySort,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sort_ascending_and_descending() {
        assert_eq!(
            CategorySort::parse("title"),
            Some(CategorySort {
                column: CategorySortColumn::Title,
                descending: false
            })
        );
        let desc = CategorySort::parse("-created_at").unwrap();
        assert!(desc.descending);
        assert_eq!(desc.sql(), "created_at DESC, id DESC");
    }

    #[test]
    fn parse_sort_rejects_unknown_columns() {
        assert_eq!(CategorySort::parse("password"), None);
        assert_eq!(CategorySort::parse("-title; DROP TABLE"), None);
        assert_eq!(CategorySort::parse(""), None);
    }
}
