//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use folio_core::translation::Translations;
use serde::Deserialize;

use crate::state::AppState;

/// Default page size for paginated listings.
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: i64 = 100;

/// Page-based pagination parameters (`?page=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// 1-based page number, never below 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_PER_PAGE`.
    pub fn per_page(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

#[derive(Debug, Deserialize)]
struct LocaleParams {
    locale: Option<String>,
}

/// The locale a request reads and writes translatable attributes in.
///
/// Taken from `?locale=`, falling back to the configured default.
#[derive(Debug, Clone)]
pub struct Locale {
    pub requested: String,
    pub fallback: String,
}

impl Locale {
    pub fn new(requested: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            fallback: fallback.into(),
        }
    }

    /// Resolve a translatable value for this request.
    pub fn resolve(&self, value: &Translations) -> Option<String> {
        value
            .resolve(&self.requested, &self.fallback)
            .map(str::to_string)
    }
}

impl FromRequestParts<AppState> for Locale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let fallback = state.config.default_locale.clone();
        let requested = Query::<LocaleParams>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(params)| params.locale)
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| fallback.clone());
        Ok(Locale::new(requested, fallback))
    }
}
