//! Product listing and detail pages.

use askama::Template;
use kube_ec_core::ProductId;
use tracing::instrument;

use super::{Page, Route, clamp_quantity, format_price};
use crate::api::{Product, ProductListResponse, ProductQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Product summary for listings.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: u32,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            stock: product.stock_quantity,
            in_stock: product.in_stock(),
        }
    }
}

/// Product listing page.
#[derive(Debug, Clone, Template)]
#[template(path = "products/index.txt")]
pub struct ProductsIndexView {
    pub products: Vec<ProductCardView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub search: Option<String>,
    pub category: Option<String>,
    pub error: Option<String>,
}

impl ProductsIndexView {
    fn new(query: &ProductQuery) -> Self {
        Self {
            products: Vec::new(),
            current_page: query.page,
            total_pages: 0,
            total_count: 0,
            search: query.search.clone().filter(|s| !s.is_empty()),
            category: query.category.clone().filter(|c| !c.is_empty()),
            error: None,
        }
    }

    fn with_response(mut self, response: &ProductListResponse) -> Self {
        self.products = response.products.iter().map(ProductCardView::from).collect();
        let pagination = response.pagination;
        if pagination.current_page > 0 {
            self.current_page = pagination.current_page;
        }
        self.total_pages = pagination.total_pages.max(1);
        self.total_count = pagination.total_count;
        self
    }
}

/// Full product information for the detail page.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub sku: String,
    pub price: String,
    pub stock: u32,
    pub image_urls: Vec<String>,
    /// Units of this product already in the cart.
    pub in_cart: u32,
}

/// Product detail page.
#[derive(Debug, Clone, Template)]
#[template(path = "products/show.txt")]
pub struct ProductDetailView {
    pub product: Option<ProductDetail>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl ProductDetailView {
    fn found(product: &Product, state: &AppState) -> Self {
        let in_cart = state.cart().get(&product.id).map_or(0, |item| item.quantity);
        Self {
            product: Some(ProductDetail {
                id: product.id.to_string(),
                name: product.name.clone(),
                description: product.description.clone(),
                category: product.category.clone(),
                sku: product.sku.clone(),
                price: format_price(product.price.amount, &product.price.currency),
                stock: product.stock_quantity,
                image_urls: product.image_urls.clone(),
                in_cart,
            }),
            notice: None,
            error: None,
        }
    }

    fn not_found(message: Option<String>) -> Self {
        Self {
            product: None,
            notice: None,
            error: message,
        }
    }
}

// =============================================================================
// Controllers
// =============================================================================

/// Product listing with pagination and optional category/search filters.
///
/// Listings run through the search sequencer: when a newer listing starts
/// before this one finishes, this one yields `Page::Superseded`.
#[instrument(skip(state))]
pub async fn index(state: &AppState, query: ProductQuery) -> Page<ProductsIndexView> {
    let view = ProductsIndexView::new(&query);
    let result = state
        .search_sequencer()
        .run(state.api().list_products(&query))
        .await;

    match result {
        None => Page::Superseded,
        Some(Ok(response)) => Page::Render(view.with_response(&response)),
        Some(Err(e)) => {
            let err = AppError::from(e);
            err.log();
            Page::Render(ProductsIndexView {
                error: Some(err.user_message()),
                ..view
            })
        }
    }
}

/// Product detail. A missing product renders a not-found view.
#[instrument(skip(state))]
pub async fn show(state: &AppState, id: &ProductId) -> Page<ProductDetailView> {
    match state.api().get_product(id).await {
        Ok(product) => Page::Render(ProductDetailView::found(&product, state)),
        Err(e) if e.is_not_found() => Page::Render(ProductDetailView::not_found(None)),
        Err(e) => {
            let err = AppError::from(e);
            err.log();
            Page::Render(ProductDetailView::not_found(Some(err.user_message())))
        }
    }
}

/// Add a product to the cart, clamping the quantity into `1..=stock`.
///
/// # Errors
///
/// Returns `AppError::NotFound` for unknown products, `AppError::Validation`
/// for products out of stock, or a storage error if the cart cannot be saved.
#[instrument(skip(state))]
pub async fn add_to_cart(
    state: &mut AppState,
    id: &ProductId,
    quantity: u32,
) -> Result<Page<ProductDetailView>, AppError> {
    let product = fetch_purchasable(state, id).await?;
    let quantity = clamp_quantity(quantity, product.stock_quantity);

    state.cart_mut().add_item(product.clone(), quantity)?;
    tracing::info!(product_id = %product.id, quantity, "Added to cart");

    let mut view = ProductDetailView::found(&product, state);
    view.notice = Some(format!("Added {quantity} × {} to your cart", product.name));
    Ok(Page::Render(view))
}

/// Add a product to the cart and go straight to the cart.
///
/// Signed-out users are sent to the login page and nothing is added.
///
/// # Errors
///
/// Same as [`add_to_cart`].
#[instrument(skip(state))]
pub async fn buy_now(
    state: &mut AppState,
    id: &ProductId,
    quantity: u32,
) -> Result<Page<ProductDetailView>, AppError> {
    if !state.session().is_authenticated() {
        return Ok(Page::Redirect(Route::Login));
    }

    let product = fetch_purchasable(state, id).await?;
    let quantity = clamp_quantity(quantity, product.stock_quantity);
    state.cart_mut().add_item(product, quantity)?;

    Ok(Page::Redirect(Route::Cart))
}

/// Fetch a product that can currently be added to the cart.
async fn fetch_purchasable(state: &AppState, id: &ProductId) -> Result<Product, AppError> {
    let product = state.api().get_product(id).await.map_err(|e| {
        if e.is_not_found() {
            AppError::NotFound(format!("Product {id} not found"))
        } else {
            AppError::from(e)
        }
    })?;

    if !product.in_stock() {
        return Err(AppError::Validation(format!(
            "{} is out of stock",
            product.name
        )));
    }
    Ok(product)
}
