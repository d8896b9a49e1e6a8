//! # Domain Types
//!
//! Core domain types used throughout Telos.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │    Customer     │   │     Product     │   │      Order      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │   │
//! │  │  tax_id (biz)   │   │  name (biz)     │   │  customer_id    │   │
//! │  │  business_name  │   │  price / 36 /48 │   │  branch_id?     │   │
//! │  │  is_multi_branch│   │  category tag   │   │  totals         │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘   │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │   PaymentPlan   │   │ ProductCategory │   │   OrderStatus   │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  OneTime        │   │  Otc            │   │  Pending        │   │
//! │  │  Monthly36      │   │  Service        │   │  Completed      │   │
//! │  │  Monthly48      │   │  OneTime        │   │                 │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Customers and products carry two identities:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key: tax id / product name - human-facing, unique

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::Totals;

// =============================================================================
// Payment Plan
// =============================================================================

/// The payment plan chosen for an entire order.
///
/// Selects which price field of every product applies: the one-time price,
/// or one of the two installment-plan prices (36 or 48 monthly payments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentPlan {
    /// Single up-front payment.
    #[default]
    #[serde(rename = "one-time")]
    OneTime,
    /// 36 monthly installments.
    #[serde(rename = "36")]
    Monthly36,
    /// 48 monthly installments.
    #[serde(rename = "48")]
    Monthly48,
}

impl PaymentPlan {
    /// Parses a plan tag leniently.
    ///
    /// Any tag other than `"36"` or `"48"` resolves to [`PaymentPlan::OneTime`].
    /// Pricing treats every unrecognized plan as a one-time payment, so the
    /// parse never fails.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "36" => PaymentPlan::Monthly36,
            "48" => PaymentPlan::Monthly48,
            _ => PaymentPlan::OneTime,
        }
    }

    /// Returns the canonical wire tag (`"one-time"`, `"36"`, `"48"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentPlan::OneTime => "one-time",
            PaymentPlan::Monthly36 => "36",
            PaymentPlan::Monthly48 => "48",
        }
    }

    /// Number of monthly installments, if this is an installment plan.
    pub const fn installments(&self) -> Option<u32> {
        match self {
            PaymentPlan::OneTime => None,
            PaymentPlan::Monthly36 => Some(36),
            PaymentPlan::Monthly48 => Some(48),
        }
    }
}

// =============================================================================
// Product Category
// =============================================================================

/// The accounting bucket a product's revenue falls into.
///
/// Products carry a free-text category tag; only these three tags map to a
/// totals bucket. Anything else contributes to no bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "OTC")]
    Otc,
    #[serde(rename = "Service")]
    Service,
    #[serde(rename = "One time")]
    OneTime,
}

impl ProductCategory {
    /// Maps a product's category tag to its bucket.
    ///
    /// Returns `None` for unrecognized tags; callers drop the contribution
    /// rather than erroring.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "OTC" => Some(ProductCategory::Otc),
            "Service" => Some(ProductCategory::Service),
            "One time" => Some(ProductCategory::OneTime),
            _ => None,
        }
    }

    /// Returns the canonical catalog tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Otc => "OTC",
            ProductCategory::Service => "Service",
            ProductCategory::OneTime => "One time",
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of a submitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Freshly submitted, waiting to be worked.
    #[default]
    Pending,
    /// Fulfilled and archived to the completed board.
    Completed,
}

impl OrderStatus {
    /// Parses a status tag leniently; unknown tags read as [`OrderStatus::Pending`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "completed" => OrderStatus::Completed,
            _ => OrderStatus::Pending,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer (company) on record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Registered business name.
    pub business_name: String,

    /// Tax identifier - unique business key, immutable once created.
    pub tax_id: String,

    /// Full street address of the business (the implicit main location).
    pub address: String,

    /// Contact phone number.
    pub phone: String,

    /// Billing email address.
    pub email: String,

    /// Authorized signatory: full name.
    pub auth_name: String,

    /// Authorized signatory: mobile number.
    pub auth_mobile: String,

    /// Authorized signatory: email address.
    pub auth_email: String,

    /// Kind of legal entity (e.g. licensed dealer, Ltd).
    pub business_type: Option<String>,

    /// Current internet provider, for porting/installation planning.
    pub internet_provider: Option<String>,

    /// Free-text notes.
    pub notes: String,

    /// Whether the customer operates multiple branches.
    pub is_multi_branch: bool,

    /// When the customer record was created.
    pub created_at: DateTime<Utc>,
}

/// Input record for creating a customer.
///
/// Same shape as [`Customer`] minus the gateway-assigned fields. Defaults to
/// an all-empty record so the wizard can bind form fields directly to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub auth_name: String,
    pub auth_mobile: String,
    pub auth_email: String,
    pub business_type: Option<String>,
    pub internet_provider: Option<String>,
    pub notes: String,
    pub is_multi_branch: bool,
}

// =============================================================================
// Branch
// =============================================================================

/// A physical location belonging to a multi-branch customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// Pricing fields may be absent; resolution degrades to the one-time price
/// or to zero (see [`crate::pricing::resolve_price`]), never to an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name - unique business key.
    pub name: String,

    /// One-time payment price.
    pub price: Option<f64>,

    /// Per-installment price under the 36-payment plan.
    pub price_36: Option<f64>,

    /// Per-installment price under the 48-payment plan.
    pub price_48: Option<f64>,

    /// Free-text description.
    pub description: String,

    /// Product type tag (hardware, line, service bundle, ...).
    pub product_type: String,

    /// Category tag. The recognized bucket tags are `OTC`, `Service` and
    /// `One time`; anything else is kept verbatim but contributes to no
    /// totals bucket.
    pub category: String,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates an empty product with a fresh id, named `name`.
    ///
    /// ## Example
    /// ```rust
    /// use telos_core::types::Product;
    ///
    /// let mut router = Product::new("Router");
    /// router.price = Some(100.0);
    /// router.category = "OTC".to_string();
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            price: None,
            price_36: None,
            price_48: None,
            description: String::new(),
            product_type: String::new(),
            category: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Returns the product's totals bucket, if its category tag is recognized.
    pub fn bucket(&self) -> Option<ProductCategory> {
        ProductCategory::from_tag(&self.category)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of an order being composed: a product reference plus a quantity.
///
/// The reference is matched against the catalog by product name or id at
/// aggregation and submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_ref: String,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(product_ref: impl Into<String>, quantity: i64) -> Self {
        LineItem {
            product_ref: product_ref.into(),
            quantity,
        }
    }
}

impl Default for LineItem {
    /// A blank wizard row: no product chosen yet, quantity 1.
    fn default() -> Self {
        LineItem {
            product_ref: String::new(),
            quantity: 1,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A submitted order.
///
/// Totals are derived from the line items under the chosen plan at
/// submission time; they are never edited independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    /// Branch this order installs at; `None` for single-location customers.
    pub branch_id: Option<String>,
    pub payment_plan: PaymentPlan,
    pub totals: Totals,
    pub notes: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Item
// =============================================================================

/// A persisted line item of an order.
///
/// The unit price is frozen at submission time under the order's plan, so
/// later catalog price changes never alter order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price at time of submission (frozen).
    pub unit_price: f64,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Line total under the frozen unit price.
    #[inline]
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_plan_tags() {
        assert_eq!(PaymentPlan::from_tag("36"), PaymentPlan::Monthly36);
        assert_eq!(PaymentPlan::from_tag("48"), PaymentPlan::Monthly48);
        assert_eq!(PaymentPlan::from_tag("one-time"), PaymentPlan::OneTime);
        // Lenient: anything unrecognized reads as one-time
        assert_eq!(PaymentPlan::from_tag("monthly"), PaymentPlan::OneTime);
        assert_eq!(PaymentPlan::from_tag(""), PaymentPlan::OneTime);

        assert_eq!(PaymentPlan::Monthly36.as_str(), "36");
        assert_eq!(PaymentPlan::OneTime.as_str(), "one-time");
        assert_eq!(PaymentPlan::Monthly48.installments(), Some(48));
        assert_eq!(PaymentPlan::OneTime.installments(), None);
    }

    #[test]
    fn test_payment_plan_serde_tags() {
        let json = serde_json::to_string(&PaymentPlan::Monthly36).unwrap();
        assert_eq!(json, "\"36\"");
        let plan: PaymentPlan = serde_json::from_str("\"one-time\"").unwrap();
        assert_eq!(plan, PaymentPlan::OneTime);
    }

    #[test]
    fn test_category_tags() {
        assert_eq!(ProductCategory::from_tag("OTC"), Some(ProductCategory::Otc));
        assert_eq!(
            ProductCategory::from_tag("One time"),
            Some(ProductCategory::OneTime)
        );
        assert_eq!(ProductCategory::from_tag("Hardware"), None);
        assert_eq!(ProductCategory::from_tag(""), None);
    }

    #[test]
    fn test_order_status_tags() {
        assert_eq!(OrderStatus::from_tag("completed"), OrderStatus::Completed);
        assert_eq!(OrderStatus::from_tag("pending"), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_tag("archived"), OrderStatus::Pending);
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_product_bucket() {
        let mut p = Product::new("Router");
        p.category = "OTC".to_string();
        assert_eq!(p.bucket(), Some(ProductCategory::Otc));

        p.category = "Accessory".to_string();
        assert_eq!(p.bucket(), None);
    }

    #[test]
    fn test_line_item_default_is_blank_row() {
        let item = LineItem::default();
        assert!(item.product_ref.is_empty());
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_order_item_line_total() {
        let item = OrderItem {
            id: "i1".to_string(),
            order_id: "o1".to_string(),
            product_id: "p1".to_string(),
            quantity: 3,
            unit_price: 4.0,
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total(), 12.0);
    }
}
