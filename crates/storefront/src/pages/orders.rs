//! Order history pages. Orders are fetched on every visit, never cached.

use askama::Template;
use kube_ec_core::OrderId;
use tracing::instrument;

use super::{Page, format_price, require_auth};
use crate::api::{Order, OrderListResponse, Timestamp};
use crate::error::AppError;
use crate::state::AppState;

/// One order line for templates.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub subtotal: String,
}

/// Order summary for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub placed_on: Option<String>,
    pub status: String,
    pub lines: Vec<OrderLineView>,
    pub total: String,
    pub ship_to: Option<String>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            placed_on: order
                .created_at
                .and_then(Timestamp::to_datetime)
                .map(|at| at.format("%Y-%m-%d").to_string()),
            status: order.status.label().to_string(),
            lines: order
                .items
                .iter()
                .map(|item| OrderLineView {
                    name: item.product_name.clone(),
                    quantity: item.quantity,
                    subtotal: format_price(item.subtotal.amount, &item.subtotal.currency),
                })
                .collect(),
            total: order.total_amount.to_string(),
            ship_to: order.shipping_address.as_ref().map(|address| {
                format!(
                    "〒{} {} {} {}",
                    address.postal_code, address.prefecture, address.city, address.address_line1
                )
            }),
        }
    }
}

/// Order history page.
#[derive(Debug, Clone, Template)]
#[template(path = "orders/index.txt")]
pub struct OrdersIndexView {
    pub orders: Vec<OrderView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub error: Option<String>,
}

impl OrdersIndexView {
    fn new(page: u32) -> Self {
        Self {
            orders: Vec::new(),
            current_page: page,
            total_pages: 0,
            total_count: 0,
            error: None,
        }
    }

    fn with_response(mut self, response: &OrderListResponse) -> Self {
        self.orders = response.orders.iter().map(OrderView::from).collect();
        let pagination = response.pagination;
        if pagination.current_page > 0 {
            self.current_page = pagination.current_page;
        }
        self.total_pages = pagination.total_pages.max(1);
        self.total_count = pagination.total_count;
        self
    }
}

/// Single order page.
#[derive(Debug, Clone, Template)]
#[template(path = "orders/show.txt")]
pub struct OrderDetailView {
    pub order: Option<OrderView>,
    pub error: Option<String>,
}

/// List the signed-in user's orders. Signed-out users go to login.
#[instrument(skip(state))]
pub async fn index(state: &AppState, page: u32) -> Page<OrdersIndexView> {
    let credentials = match require_auth(state) {
        Ok(credentials) => credentials,
        Err(route) => return Page::Redirect(route),
    };

    let page = page.max(1);
    let view = OrdersIndexView::new(page);
    let result = state
        .api()
        .list_orders(
            &credentials.user.id,
            page,
            state.config().page_size,
            &credentials.token,
        )
        .await;

    match result {
        Ok(response) => Page::Render(view.with_response(&response)),
        Err(e) => {
            let err = AppError::from(e);
            err.log();
            Page::Render(OrdersIndexView {
                error: Some(err.user_message()),
                ..view
            })
        }
    }
}

/// Show one order. Signed-out users go to login.
#[instrument(skip(state))]
pub async fn show(state: &AppState, id: &OrderId) -> Page<OrderDetailView> {
    let credentials = match require_auth(state) {
        Ok(credentials) => credentials,
        Err(route) => return Page::Redirect(route),
    };

    match state.api().get_order(id, &credentials.token).await {
        Ok(order) => Page::Render(OrderDetailView {
            order: Some(OrderView::from(&order)),
            error: None,
        }),
        Err(e) if e.is_not_found() => Page::Render(OrderDetailView {
            order: None,
            error: None,
        }),
        Err(e) => {
            let err = AppError::from(e);
            err.log();
            Page::Render(OrderDetailView {
                order: None,
                error: Some(err.user_message()),
            })
        }
    }
}
