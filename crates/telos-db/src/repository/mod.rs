//! # Repository Module
//!
//! Database repository implementations for Telos.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                               │
//! │                                                                     │
//! │  Caller                                                             │
//! │       │                                                             │
//! │       │  db.customers().search("aroma")                             │
//! │       ▼                                                             │
//! │  CustomerRepository                                                 │
//! │  ├── list / search / get_by_tax_id                                  │
//! │  ├── create                                                         │
//! │  └── create_branch / list_branches                                  │
//! │       │                                                             │
//! │       │  SQL Query                                                  │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! │                                                                     │
//! │  SQL is isolated here; everything above works with domain types.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`customer::CustomerRepository`] - Customers and their branches
//! - [`product::ProductRepository`] - Catalog browsing and search
//! - [`order::OrderRepository`] - Orders and order items

pub mod customer;
pub mod order;
pub mod product;
