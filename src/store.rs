// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for categories, products, locations, customers and
//! orders.
//!
//! Ids are assigned per table from 1 upwards and never reused. The store
//! enforces referential rules itself: a category that still has products and
//! a customer that still has orders cannot be deleted, customer emails are
//! unique (case-insensitive) and addresses must name a known city.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::error::ApiError;
use crate::models::{
    Category, CategoryRequest, City, Customer, CustomerUpdateRequest, Direction, NewCustomer,
    NewOrderRequest, Order, OrderItem, Page, PageRequest, Product, ProductRequest, Province,
};

struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(u64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: u64) -> Option<&T> {
        self.rows.get(&id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    fn remove(&mut self, id: u64) -> Option<T> {
        self.rows.remove(&id)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }
}

#[derive(Default)]
pub struct Store {
    categories: Table<Category>,
    products: Table<Product>,
    provinces: Table<Province>,
    cities: Table<City>,
    customers: Table<Customer>,
    orders: Table<Order>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    pub fn find_category(&self, id: u64) -> Result<Category, ApiError> {
        self.categories
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("Category not found: {id}")))
    }

    pub fn list_categories(&self) -> Vec<Category> {
        self.categories.values().cloned().collect()
    }

    pub fn page_categories(&self, request: &PageRequest) -> Result<Page<Category>, ApiError> {
        request.paginate(self.list_categories(), "name", Direction::Asc)
    }

    pub fn insert_category(&mut self, request: CategoryRequest) -> Category {
        self.categories.insert_with(|id| Category {
            id,
            name: request.name,
        })
    }

    pub fn update_category(&mut self, id: u64, request: CategoryRequest) -> Result<(), ApiError> {
        let Some(category) = self.categories.get_mut(id) else {
            return Err(ApiError::not_found(format!("Category not found: {id}")));
        };
        category.name = request.name;
        Ok(())
    }

    pub fn delete_category(&mut self, id: u64) -> Result<(), ApiError> {
        self.find_category(id)?;
        if self
            .products
            .values()
            .any(|product| product.category_ids.contains(&id))
        {
            return Err(ApiError::data_integrity(
                "Cannot delete a category that still has products",
            ));
        }
        self.categories.remove(id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub fn find_product(&self, id: u64) -> Result<Product, ApiError> {
        self.products
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("Product not found: {id}")))
    }

    pub fn insert_product(&mut self, request: ProductRequest) -> Result<Product, ApiError> {
        let mut category_ids = request.category_ids;
        category_ids.sort_unstable();
        category_ids.dedup();
        if let Some(missing) = category_ids
            .iter()
            .find(|id| self.categories.get(**id).is_none())
        {
            return Err(ApiError::field(
                "category_ids",
                format!("Unknown category: {missing}"),
            ));
        }

        Ok(self.products.insert_with(|id| Product {
            id,
            name: request.name,
            price: request.price,
            category_ids,
        }))
    }

    /// Products whose name contains `name` (case-insensitive) and that belong
    /// to at least one of `category_ids`. An empty id list matches every
    /// category.
    pub fn search_products(
        &self,
        name: &str,
        category_ids: &[u64],
        request: &PageRequest,
    ) -> Result<Page<Product>, ApiError> {
        let needle = name.to_lowercase();
        let matches = self
            .products
            .values()
            .filter(|product| product.name.to_lowercase().contains(&needle))
            .filter(|product| {
                category_ids.is_empty()
                    || product
                        .category_ids
                        .iter()
                        .any(|id| category_ids.contains(id))
            })
            .cloned()
            .collect();
        request.paginate(matches, "name", Direction::Asc)
    }

    // -------------------------------------------------------------------------
    // Locations
    // -------------------------------------------------------------------------

    /// All states, by name.
    pub fn list_provinces(&self) -> Vec<Province> {
        let mut provinces: Vec<Province> = self.provinces.values().cloned().collect();
        provinces.sort_by(|a, b| a.name.cmp(&b.name));
        provinces
    }

    /// Cities of one state, by name.
    pub fn cities_of(&self, province_id: u64) -> Result<Vec<City>, ApiError> {
        if self.provinces.get(province_id).is_none() {
            return Err(ApiError::not_found(format!("State not found: {province_id}")));
        }
        let mut cities: Vec<City> = self
            .cities
            .values()
            .filter(|city| city.state_id == province_id)
            .cloned()
            .collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cities)
    }

    pub fn insert_province(&mut self, name: &str) -> Province {
        self.provinces.insert_with(|id| Province {
            id,
            name: name.to_string(),
        })
    }

    pub fn insert_city(&mut self, province_id: u64, name: &str) -> Result<City, ApiError> {
        if self.provinces.get(province_id).is_none() {
            return Err(ApiError::not_found(format!("State not found: {province_id}")));
        }
        Ok(self.cities.insert_with(|id| City {
            id,
            name: name.to_string(),
            state_id: province_id,
        }))
    }

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    pub fn find_customer(&self, id: u64) -> Result<Customer, ApiError> {
        self.customers
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("Customer not found: {id}")))
    }

    pub fn customer_by_email(&self, email: &str) -> Option<&Customer> {
        self.customers
            .values()
            .find(|customer| customer.email.eq_ignore_ascii_case(email))
    }

    pub fn find_customer_by_email(&self, email: &str) -> Result<Customer, ApiError> {
        self.customer_by_email(email)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("Customer not found: {email}")))
    }

    pub fn list_customers(&self) -> Vec<Customer> {
        self.customers.values().cloned().collect()
    }

    pub fn page_customers(&self, request: &PageRequest) -> Result<Page<Customer>, ApiError> {
        request.paginate(self.list_customers(), "name", Direction::Asc)
    }

    pub fn insert_customer(&mut self, new: NewCustomer) -> Result<Customer, ApiError> {
        if self.customer_by_email(&new.email).is_some() {
            return Err(ApiError::field("email", "Email already registered"));
        }
        if let Some(address) = new
            .addresses
            .iter()
            .find(|address| self.cities.get(address.city_id).is_none())
        {
            return Err(ApiError::field(
                "address.city_id",
                format!("Unknown city: {}", address.city_id),
            ));
        }

        Ok(self.customers.insert_with(|id| Customer {
            id,
            name: new.name,
            email: new.email,
            document: new.document,
            kind: new.kind,
            phones: new.phones,
            addresses: new.addresses,
            roles: new.roles,
            password_hash: new.password_hash,
        }))
    }

    pub fn update_customer(
        &mut self,
        id: u64,
        request: CustomerUpdateRequest,
    ) -> Result<(), ApiError> {
        if self
            .customer_by_email(&request.email)
            .is_some_and(|other| other.id != id)
        {
            return Err(ApiError::field("email", "Email already registered"));
        }

        let Some(customer) = self.customers.get_mut(id) else {
            return Err(ApiError::not_found(format!("Customer not found: {id}")));
        };
        customer.name = request.name;
        customer.email = request.email;
        Ok(())
    }

    /// Replace the stored password hash of customer `id`.
    pub fn set_password_hash(&mut self, id: u64, password_hash: String) -> Result<(), ApiError> {
        let Some(customer) = self.customers.get_mut(id) else {
            return Err(ApiError::not_found(format!("Customer not found: {id}")));
        };
        customer.password_hash = password_hash;
        Ok(())
    }

    pub fn delete_customer(&mut self, id: u64) -> Result<(), ApiError> {
        self.find_customer(id)?;
        if self.orders.values().any(|order| order.customer_id == id) {
            return Err(ApiError::data_integrity(
                "Cannot delete a customer that has orders",
            ));
        }
        self.customers.remove(id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    pub fn find_order(&self, id: u64) -> Result<Order, ApiError> {
        self.orders
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("Order not found: {id}")))
    }

    /// Place an order for `customer_id`, pricing items at current prices.
    pub fn insert_order(
        &mut self,
        customer_id: u64,
        request: NewOrderRequest,
    ) -> Result<Order, ApiError> {
        self.find_customer(customer_id)?;

        let items = request
            .items
            .into_iter()
            .map(|item| {
                let product = self.find_product(item.product_id)?;
                if item.discount > product.price {
                    return Err(ApiError::field(
                        "items",
                        format!("Discount exceeds the price of product {}", product.id),
                    ));
                }
                Ok(OrderItem {
                    product_id: product.id,
                    quantity: item.quantity,
                    discount: item.discount,
                    price: product.price,
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;
        let total: f64 = items.iter().map(OrderItem::subtotal).sum();

        Ok(self.orders.insert_with(|id| Order {
            id,
            instant: Utc::now(),
            customer_id,
            items,
            total,
        }))
    }

    /// Orders placed by `customer_id`, newest first unless asked otherwise.
    pub fn page_orders_of(
        &self,
        customer_id: u64,
        request: &PageRequest,
    ) -> Result<Page<Order>, ApiError> {
        let orders = self
            .orders
            .values()
            .filter(|order| order.customer_id == customer_id)
            .cloned()
            .collect();
        request.paginate(orders, "instant", Direction::Desc)
    }

    // -------------------------------------------------------------------------
    // Seeding
    // -------------------------------------------------------------------------

    /// Fill empty location tables with demo states and cities.
    pub fn seed_demo_locations(&mut self) {
        let locations: [(&str, &[&str]); 2] = [
            ("Minas Gerais", &["Uberlândia"]),
            ("São Paulo", &["São Paulo", "Campinas"]),
        ];
        for (province, cities) in locations {
            let province = self.insert_province(province);
            for city in cities {
                self.cities.insert_with(|id| City {
                    id,
                    name: (*city).to_string(),
                    state_id: province.id,
                });
            }
        }
    }

    /// Fill an empty catalog with demo categories and products.
    pub fn seed_demo_catalog(&mut self) {
        let names = [
            "Computing",
            "Office supplies",
            "Bed and bath",
            "Electronics",
            "Gardening",
            "Decoration",
            "Perfumery",
        ];
        let ids: Vec<u64> = names
            .iter()
            .map(|name| {
                self.insert_category(CategoryRequest {
                    name: (*name).to_string(),
                })
                .id
            })
            .collect();

        let products: [(&str, f64, &[usize]); 11] = [
            ("Computer", 2000.0, &[0, 3]),
            ("Printer", 800.0, &[0, 1, 3]),
            ("Mouse", 80.0, &[0, 3]),
            ("Office desk", 300.0, &[1]),
            ("Towel", 50.0, &[2]),
            ("Quilt", 200.0, &[2]),
            ("True color TV", 1200.0, &[3]),
            ("Brush cutter", 800.0, &[4]),
            ("Lampshade", 100.0, &[5]),
            ("Pendant lamp", 180.0, &[5]),
            ("Shampoo", 90.0, &[6]),
        ];
        for (name, price, categories) in products {
            let category_ids = categories.iter().map(|index| ids[*index]).collect();
            self.products.insert_with(|id| Product {
                id,
                name: name.to_string(),
                price,
                category_ids,
            });
        }
    }
}
