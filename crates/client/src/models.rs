//! Wire types exchanged with `/api/categories`.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// A category as returned by the API.
///
/// `projects` is only present when the listing asked for it with `include`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: DbId,
    pub title: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub projects: Option<Vec<serde_json::Value>>,
}

/// One page of a category listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPage {
    pub data: Vec<Category>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Table state of the admin listing.
///
/// Mirrors what a data table reports: parallel lists of sort columns and
/// directions, plus paging.
#[derive(Debug, Clone, Default)]
pub struct AdminCategoryQuery {
    pub sort_by: Vec<String>,
    pub sort_desc: Vec<bool>,
    pub page: Option<i64>,
    pub items_per_page: Option<i64>,
}

impl AdminCategoryQuery {
    /// The `sort` parameter, set only for a single column with a single
    /// direction.
    pub fn sort(&self) -> Option<String> {
        match (self.sort_by.as_slice(), self.sort_desc.as_slice()) {
            ([column], [true]) => Some(format!("-{column}")),
            ([column], [false]) => Some(column.clone()),
            _ => None,
        }
    }

    /// Query pairs for the listing request.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.items_per_page {
            params.push(("limit", limit.to_string()));
        }
        if let Some(sort) = self.sort() {
            params.push(("sort", sort));
        }
        params
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCategoryPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Partial update. Absent fields keep their remote value.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryPayload {
    pub id: DbId,
    pub title: Option<String>,
    pub active: Option<bool>,
}

/// Body sent on `PUT /api/categories/{id}`.
#[derive(Debug, Serialize)]
pub(crate) struct CategoryBody<'a> {
    pub title: &'a str,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(sort_by: &[&str], sort_desc: &[bool]) -> AdminCategoryQuery {
        AdminCategoryQuery {
            sort_by: sort_by.iter().map(|s| s.to_string()).collect(),
            sort_desc: sort_desc.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn sort_needs_exactly_one_column_and_direction() {
        assert_eq!(query(&["title"], &[false]).sort().as_deref(), Some("title"));
        assert_eq!(query(&["title"], &[true]).sort().as_deref(), Some("-title"));
        assert_eq!(query(&[], &[]).sort(), None);
        assert_eq!(query(&["title"], &[]).sort(), None);
        assert_eq!(query(&["title", "id"], &[true, false]).sort(), None);
    }

    #[test]
    fn params_skip_missing_paging() {
        let mut q = query(&["id"], &[true]);
        assert_eq!(q.params(), vec![("sort", "-id".to_string())]);

        q.page = Some(2);
        q.items_per_page = Some(10);
        assert_eq!(
            q.params(),
            vec![
                ("page", "2".to_string()),
                ("limit", "10".to_string()),
                ("sort", "-id".to_string()),
            ]
        );
    }
}
