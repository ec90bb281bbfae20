//! Catalog endpoints. Public; no credentials are sent.

use kube_ec_core::ProductId;
use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError, Product, ProductListResponse, ProductQuery};

impl ApiClient {
    /// List products with pagination and optional category/search filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(page = query.page, page_size = query.page_size))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductListResponse, ApiError> {
        let mut url = self.endpoint(&["products"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &query.page.to_string())
                .append_pair("page_size", &query.page_size.to_string());
            if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
                pairs.append_pair("category", category);
            }
            if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("search", search);
            }
        }

        let response: ProductListResponse =
            self.send(self.request(Method::GET, url, None)).await?;

        tracing::debug!(count = response.products.len(), "Fetched products");
        Ok(response)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with status 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        self.send(self.request(Method::GET, url, None)).await
    }
}
