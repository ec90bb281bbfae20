//! Wire types for the Kube EC REST API.
//!
//! The gateway serializes protobuf messages with zero-valued fields
//! omitted, so response structs default missing fields. The user and
//! token of an auth response are the exception: without them there is no
//! session to start.

use std::fmt;

use chrono::{DateTime, Utc};
use kube_ec_core::{
    Money, OrderId, OrderStatus, PaymentId, PaymentMethod, PaymentStatus, ProductId, UserId,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// Credentials
// =============================================================================

/// Opaque bearer credential issued by the auth service.
///
/// Debug output is redacted; the raw value is only reachable through
/// [`AccessToken::expose`].
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    /// The raw token, for the `Authorization` header and durable storage.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Whether the token is blank and so cannot authenticate anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for AccessToken {}

impl<'de> Deserialize<'de> for AccessToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Serialize a secret by exposing it. Only used for request bodies.
fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

// =============================================================================
// Catalog
// =============================================================================

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock_quantity: u32,
    pub category: String,
    pub image_urls: Vec<String>,
    pub sku: String,
    pub is_active: bool,
}

impl Product {
    /// Whether at least one unit can be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

/// Page metadata returned alongside list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Pagination {
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

/// Response of `GET /products`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Filters for `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// 1-indexed page number.
    pub page: u32,
    pub page_size: u32,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ProductQuery {
    /// First page with no filters.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            category: None,
            search: None,
        }
    }
}

// =============================================================================
// Users & Auth
// =============================================================================

/// A customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub phone_number: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
}

/// Response of the login and register endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: AccessToken,
    /// Issued by the backend but never rotated by this client.
    #[serde(default)]
    pub refresh_token: Option<AccessToken>,
}

/// Body of `PUT /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl UpdateUserRequest {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none()
    }
}

/// Response of `DELETE /users/{id}`.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(default)]
pub struct DeleteUserResponse {
    pub success: bool,
}

// =============================================================================
// Orders
// =============================================================================

/// Shipping destination (Japanese address layout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Address {
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub address_line1: String,
    pub address_line2: String,
    pub phone_number: String,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// Seconds/nanos timestamp as emitted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    /// Convert to a UTC datetime. Unset (zero) timestamps yield `None`.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if self.seconds == 0 && self.nanos == 0 {
            return None;
        }
        let nanos = u32::try_from(self.nanos).ok()?;
        DateTime::from_timestamp(self.seconds, nanos)
    }
}

/// An order as stored by the order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub shipping_address: Option<Address>,
    pub payment_id: String,
    pub created_at: Option<Timestamp>,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
}

/// Response of `GET /orders`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

// =============================================================================
// Payments
// =============================================================================

/// A payment attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub amount: Money,
    pub status: PaymentStatus,
    pub method: String,
    pub transaction_id: String,
}

/// Body of `POST /payments`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentRequest {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub amount: Money,
    pub method: PaymentMethod,
}

/// Body of `POST /payments/process`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessPaymentRequest {
    pub payment_id: PaymentId,
    #[serde(serialize_with = "expose_secret")]
    pub payment_token: SecretString,
}

/// Response of `POST /payments/process`.
///
/// A declined payment is a successful HTTP exchange with `success: false`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct ProcessPaymentResponse {
    pub success: bool,
    pub transaction_id: String,
    pub message: String,
}
