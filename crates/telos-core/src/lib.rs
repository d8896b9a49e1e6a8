//! # telos-core: Pure Business Logic for Telos
//!
//! This crate is the **heart** of Telos, a back-office order system for a
//! telecom sales operation. It contains all business logic as pure functions
//! and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Telos Architecture                           │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                    Caller (UI / service)                    │   │
//! │  │   Customer step ──► Branch step ──► Items ──► Submit        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ telos-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌───────────┐  │   │
//! │  │   │  types   │  │ pricing  │  │  draft   │  │ validation│  │   │
//! │  │   │ Customer │  │ resolve  │  │  Order   │  │   step    │  │   │
//! │  │   │ Product  │  │  Totals  │  │  Draft   │  │  checks   │  │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └───────────┘  │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                    telos-db (Database Layer)                │   │
//! │  │           SQLite repositories, migrations, submission       │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Branch, Product, Order, etc.)
//! - [`pricing`] - Plan-dependent price resolution and category totals
//! - [`draft`] - The order wizard state machine
//! - [`validation`] - Field-keyed, collect-all input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **No Thrown Validation**: Validation produces a field-keyed error map,
//!    never an `Err` that aborts the interactive flow
//! 4. **Lenient Tags**: Unknown payment-plan or category tags degrade to the
//!    one-time plan / no bucket instead of failing
//!
//! ## Example Usage
//!
//! ```rust
//! use telos_core::pricing::{compute_totals, resolve_price};
//! use telos_core::types::{LineItem, PaymentPlan, Product};
//!
//! let mut router = Product::new("Router");
//! router.price = Some(100.0);
//! router.price_36 = Some(4.0);
//! router.category = "OTC".to_string();
//!
//! assert_eq!(resolve_price(&router, PaymentPlan::Monthly36), 4.0);
//!
//! let items = vec![LineItem::new("Router", 2)];
//! let totals = compute_totals(&items, &[router], PaymentPlan::Monthly36);
//! assert_eq!(totals.otc, 8.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use telos_core::Totals` instead of
// `use telos_core::pricing::Totals`.

pub use draft::{BranchDraft, CustomerSelection, DraftStep, OrderDraft};
pub use error::{DraftError, DraftResult};
pub use pricing::{compute_totals, resolve_price, Totals};
pub use types::*;
pub use validation::ValidationErrors;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum branches a single draft may carry.
///
/// Keeps one submission to a workable size; a customer with more locations
/// files additional orders in a second pass.
pub const MAX_BRANCHES: usize = 10;
