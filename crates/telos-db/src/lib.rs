//! # telos-db: Database Layer for Telos
//!
//! This crate is the persistence gateway for the Telos order system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Telos Data Flow                             │
//! │                                                                     │
//! │  Order wizard (telos-core::OrderDraft)                              │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                     telos-db (THIS CRATE)                   │   │
//! │  │                                                             │   │
//! │  │   ┌─────────────┐   ┌───────────────┐   ┌──────────────┐   │   │
//! │  │   │  Database   │   │ Repositories  │   │  Migrations  │   │   │
//! │  │   │  (pool.rs)  │   │ customer.rs   │   │  (embedded)  │   │   │
//! │  │   │             │   │ product.rs    │   │              │   │   │
//! │  │   │ SqlitePool  │◄──│ order.rs      │   │ 001_init.sql │   │   │
//! │  │   └─────────────┘   └───────────────┘   └──────────────┘   │   │
//! │  │                                                             │   │
//! │  │   submission.rs - drives a validated draft through the      │   │
//! │  │   gateway: customer, branches, one order per branch         │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (or :memory: in tests)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, configuration and lifecycle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (customer, product, order)
//! - [`submission`] - Order submission orchestration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use telos_db::{Database, DbConfig};
//!
//! // Open at startup (runs migrations), close at shutdown - the handle is
//! // constructed explicitly and passed to whoever needs it.
//! let db = Database::new(DbConfig::new("path/to/telos.db")).await?;
//!
//! let products = db.products().search("router").await?;
//!
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod submission;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use submission::{submit_draft, SubmissionReceipt, SubmitError};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
