// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures of the REST API. Request bodies derive
//! `Validate` and are read through [`crate::extractors::ValidatedJson`].
//!
//! ## Model Categories
//!
//! - **Catalog**: categories and products
//! - **Locations**: states and their cities, referenced by addresses
//! - **Customers**: registered buyers; their email is the login name
//! - **Orders**: purchases placed by a customer
//! - **Paging**: `Page<T>` and its query parameters

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::RoleSet;
use crate::error::ApiError;

// =============================================================================
// Catalog Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

/// Request to create or rename a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 5, max = 80, message = "Length must be between 5 and 80 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub category_ids: Vec<u64>,
}

/// Request to create a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    #[serde(default)]
    pub category_ids: Vec<u64>,
}

/// Product search parameters.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductSearch {
    /// Name fragment (case-insensitive); empty matches everything.
    #[serde(default)]
    pub name: String,
    /// Comma-separated category ids, e.g. `1,3`; empty matches every category.
    #[serde(default)]
    pub categories: String,
}

impl ProductSearch {
    pub fn category_ids(&self) -> Result<Vec<u64>, ApiError> {
        self.categories
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| {
                id.parse()
                    .map_err(|_| ApiError::field("categories", format!("Invalid category id: {id}")))
            })
            .collect()
    }
}

// =============================================================================
// Location Models
// =============================================================================

/// A state of the country; served under `/states`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Province {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct City {
    pub id: u64,
    pub name: String,
    pub state_id: u64,
}

// =============================================================================
// Customer Models
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomerKind {
    Individual,
    Company,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// Tax document (individual or company registration number)
    pub document: String,
    pub kind: CustomerKind,
    pub phones: Vec<String>,
    pub addresses: Vec<Address>,
    pub roles: RoleSet,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub zip_code: String,
    pub city_id: u64,
}

/// Address given at registration; `city_id` must name a known city.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddressRequest {
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "Number is required"))]
    pub number: String,
    pub complement: Option<String>,
    pub district: Option<String>,
    #[validate(length(min = 1, message = "Zip code is required"))]
    pub zip_code: String,
    pub city_id: u64,
}

impl From<AddressRequest> for Address {
    fn from(request: AddressRequest) -> Self {
        Self {
            street: request.street,
            number: request.number,
            complement: request.complement,
            district: request.district,
            zip_code: request.zip_code,
            city_id: request.city_id,
        }
    }
}

/// Public registration request.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct NewCustomerRequest {
    #[validate(length(min = 5, max = 120, message = "Length must be between 5 and 120 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Document is required"))]
    pub document: String,
    pub kind: CustomerKind,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub phones: Vec<String>,
    #[validate(nested)]
    pub address: Option<AddressRequest>,
}

impl std::fmt::Debug for NewCustomerRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCustomerRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Customer record ready for insertion (password already hashed).
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub document: String,
    pub kind: CustomerKind,
    pub phones: Vec<String>,
    pub addresses: Vec<Address>,
    pub password_hash: String,
    pub roles: RoleSet,
}

/// Request to update a customer's name and email.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerUpdateRequest {
    #[validate(length(min = 5, max = 120, message = "Length must be between 5 and 120 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailQuery {
    #[validate(length(min = 1, message = "Email is required"))]
    pub value: String,
}

/// `POST /auth/forgot` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

// =============================================================================
// Order Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: u64,
    pub quantity: u32,
    pub discount: f64,
    /// Unit price captured when the order was placed
    pub price: f64,
}

impl OrderItem {
    pub fn subtotal(&self) -> f64 {
        (self.price - self.discount) * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: u64,
    pub instant: DateTime<Utc>,
    pub customer_id: u64,
    pub items: Vec<OrderItem>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    pub product_id: u64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Discount must not be negative"))]
    pub discount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrderRequest {
    #[validate(length(min = 1, message = "An order needs at least one item"), nested)]
    pub items: Vec<OrderItemRequest>,
}

// =============================================================================
// Paging
// =============================================================================

pub const DEFAULT_LINES_PER_PAGE: usize = 24;
pub const MAX_LINES_PER_PAGE: usize = 200;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl Direction {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// Listing that can be sorted by a fixed set of named properties.
pub trait Sortable {
    /// Property names accepted as `order_by`.
    const SORT_PROPERTIES: &'static [&'static str];

    /// Compare by `property`, one of [`Self::SORT_PROPERTIES`].
    fn compare_by(&self, other: &Self, property: &str) -> Ordering;
}

/// Paging query parameters.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PageRequest {
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_lines_per_page")]
    #[validate(range(min = 1, max = 200, message = "Must be between 1 and 200"))]
    pub lines_per_page: usize,
    pub order_by: Option<String>,
    pub direction: Option<Direction>,
}

fn default_lines_per_page() -> usize {
    DEFAULT_LINES_PER_PAGE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            order_by: None,
            direction: None,
        }
    }
}

impl PageRequest {
    /// Sort `items` by the requested property and cut out the requested page.
    ///
    /// Names outside `T::SORT_PROPERTIES` are rejected whether or not there
    /// is anything to sort.
    pub fn paginate<T: Sortable>(
        &self,
        mut items: Vec<T>,
        default_order_by: &str,
        default_direction: Direction,
    ) -> Result<Page<T>, ApiError> {
        if self.lines_per_page == 0 || self.lines_per_page > MAX_LINES_PER_PAGE {
            return Err(ApiError::field(
                "lines_per_page",
                format!("Must be between 1 and {MAX_LINES_PER_PAGE}"),
            ));
        }

        let order_by = self.order_by.as_deref().unwrap_or(default_order_by);
        let direction = self.direction.unwrap_or(default_direction);
        if !T::SORT_PROPERTIES.contains(&order_by) {
            return Err(ApiError::field(
                "order_by",
                format!("Unknown sort property: {order_by}"),
            ));
        }
        items.sort_by(|a, b| direction.apply(a.compare_by(b, order_by)));

        let total_elements = items.len();
        let total_pages = total_elements.div_ceil(self.lines_per_page);
        let content = items
            .into_iter()
            .skip(self.page.saturating_mul(self.lines_per_page))
            .take(self.lines_per_page)
            .collect();

        Ok(Page {
            content,
            page: self.page,
            lines_per_page: self.lines_per_page,
            total_elements,
            total_pages,
        })
    }
}

/// One page of a sorted listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub lines_per_page: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl Sortable for Category {
    const SORT_PROPERTIES: &'static [&'static str] = &["id", "name"];

    fn compare_by(&self, other: &Self, property: &str) -> Ordering {
        match property {
            "id" => self.id.cmp(&other.id),
            _ => self.name.cmp(&other.name),
        }
    }
}

impl Sortable for Product {
    const SORT_PROPERTIES: &'static [&'static str] = &["id", "name", "price"];

    fn compare_by(&self, other: &Self, property: &str) -> Ordering {
        match property {
            "id" => self.id.cmp(&other.id),
            "price" => self.price.total_cmp(&other.price),
            _ => self.name.cmp(&other.name),
        }
    }
}

impl Sortable for Customer {
    const SORT_PROPERTIES: &'static [&'static str] = &["id", "name", "email"];

    fn compare_by(&self, other: &Self, property: &str) -> Ordering {
        match property {
            "id" => self.id.cmp(&other.id),
            "email" => self.email.cmp(&other.email),
            _ => self.name.cmp(&other.name),
        }
    }
}

impl Sortable for Order {
    const SORT_PROPERTIES: &'static [&'static str] = &["id", "instant", "total"];

    fn compare_by(&self, other: &Self, property: &str) -> Ordering {
        match property {
            "id" => self.id.cmp(&other.id),
            "total" => self.total.total_cmp(&other.total),
            // Same-second orders keep insertion order.
            _ => self.instant.cmp(&other.instant).then(self.id.cmp(&other.id)),
        }
    }
}
