//! Category store: client-side state plus the REST actions that feed it.

use folio_core::types::DbId;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::models::{
    AdminCategoryQuery, Category, CategoryBody, CategoryPage, CreateCategoryPayload,
    UpdateCategoryPayload,
};

/// Relations embedded by [`CategoryStore::fetch_categories`].
const PUBLIC_INCLUDES: &str = "projects,projects.links,projects.tags,projects.media";

/// Page size used to walk the public listing; the API's upper bound.
const PUBLIC_PAGE_SIZE: i64 = 100;

/// HTTP client for the category endpoints of a folio API.
pub struct CategoryStore {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    categories: Vec<Category>,
}

impl CategoryStore {
    /// Create a store for an API.
    ///
    /// * `api_url` - Base URL including the `/api` prefix, e.g.
    ///   `http://localhost:3000/api`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a store reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
            categories: Vec::new(),
        }
    }

    /// Send `token` as a bearer credential on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Categories committed by the last [`fetch_categories`](Self::fetch_categories).
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Fetch every active category with its projects and commit them to the
    /// store.
    ///
    /// The listing is paginated server-side, so pages are requested until
    /// `total` categories have arrived.
    pub async fn fetch_categories(&mut self) -> Result<Vec<Category>, ClientError> {
        let mut categories = Vec::new();
        let mut page: i64 = 1;
        loop {
            let request = self
                .request(reqwest::Method::GET, "/categories")
                .query(&[("active", "true"), ("include", PUBLIC_INCLUDES)])
                .query(&[("page", page), ("limit", PUBLIC_PAGE_SIZE)]);
            let batch: CategoryPage = Self::parse_response(request.send().await?).await?;

            let received = batch.data.len();
            categories.extend(batch.data);
            if received == 0 || categories.len() as i64 >= batch.total {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = categories.len(), pages = page, "Fetched categories");
        self.categories = categories.clone();
        Ok(categories)
    }

    /// Fetch one page of the admin listing. State is left untouched.
    pub async fn fetch_admin_categories(
        &self,
        query: &AdminCategoryQuery,
    ) -> Result<CategoryPage, ClientError> {
        let request = self
            .request(reqwest::Method::GET, "/categories")
            .query(&query.params());
        Self::parse_response(request.send().await?).await
    }

    pub async fn fetch_category(&self, id: DbId) -> Result<Category, ClientError> {
        let request = self.request(reqwest::Method::GET, &format!("/categories/{id}"));
        Self::parse_response(request.send().await?).await
    }

    pub async fn create_category(
        &self,
        payload: &CreateCategoryPayload,
    ) -> Result<Category, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/categories")
            .json(payload);
        let category: Category = Self::parse_response(request.send().await?).await?;

        tracing::debug!(category_id = category.id, "Created category");
        Ok(category)
    }

    /// Fetch the category, apply the fields present in `payload` and save
    /// it back.
    pub async fn update_category(
        &self,
        payload: &UpdateCategoryPayload,
    ) -> Result<Category, ClientError> {
        let mut category = self.fetch_category(payload.id).await?;
        if let Some(title) = &payload.title {
            category.title = title.clone();
        }
        if let Some(active) = payload.active {
            category.active = active;
        }

        let body = CategoryBody {
            title: &category.title,
            active: category.active,
        };
        let request = self
            .request(reqwest::Method::PUT, &format!("/categories/{}", payload.id))
            .json(&body);
        let saved: Category = Self::parse_response(request.send().await?).await?;

        tracing::debug!(category_id = saved.id, "Updated category");
        Ok(saved)
    }

    /// Fetch the category, then delete it. Returns the deleted category.
    pub async fn delete_category(&self, id: DbId) -> Result<Category, ClientError> {
        let category = self.fetch_category(id).await?;
        let request = self.request(reqwest::Method::DELETE, &format!("/categories/{id}"));
        Self::ensure_success(request.send().await?).await?;

        tracing::debug!(category_id = id, "Deleted category");
        Ok(category)
    }

    // ---- private helpers ----

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.api_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Return the response unchanged on a 2xx status, or a
    /// [`ClientError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
