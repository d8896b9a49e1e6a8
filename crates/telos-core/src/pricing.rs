//! # Pricing Module
//!
//! Plan-dependent price resolution and category-bucketed totals.
//!
//! ## How an Order Is Priced
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Pricing Flow                                     │
//! │                                                                     │
//! │  LineItem { product_ref, quantity }                                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  find_product(catalog, ref) ── no match ──► contributes nothing     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  resolve_price(product, plan)                                       │
//! │       │   plan 36 → price_36, else one-time price, else 0           │
//! │       │   plan 48 → price_48, else one-time price, else 0           │
//! │       │   one-time → price, else 0                                  │
//! │       ▼                                                             │
//! │  line_total = unit price × quantity                                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Totals bucket by category tag:                                     │
//! │    "OTC" ──► totals.otc                                             │
//! │    "Service" ──► totals.service                                     │
//! │    "One time" ──► totals.one_time                                   │
//! │    anything else ──► dropped                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Missing prices and unknown references degrade to a zero contribution;
//! nothing in this module returns an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

use crate::types::{LineItem, PaymentPlan, Product, ProductCategory};

// =============================================================================
// Price Resolution
// =============================================================================

/// Resolves the unit price of a product under a payment plan.
///
/// ## Fallback Chain
/// - `Monthly36` → `price_36`, else the one-time price, else `0.0`
/// - `Monthly48` → `price_48`, else the one-time price, else `0.0`
/// - `OneTime` → `price`, else `0.0`
///
/// Absent prices never raise an error; callers must tolerate a zero
/// contribution to totals.
///
/// ## Example
/// ```rust
/// use telos_core::pricing::resolve_price;
/// use telos_core::types::{PaymentPlan, Product};
///
/// let mut router = Product::new("Router");
/// router.price = Some(100.0);
/// router.price_36 = Some(4.0);
///
/// assert_eq!(resolve_price(&router, PaymentPlan::Monthly36), 4.0);
/// assert_eq!(resolve_price(&router, PaymentPlan::OneTime), 100.0);
/// // No 48-plan price on record: falls back to the one-time price
/// assert_eq!(resolve_price(&router, PaymentPlan::Monthly48), 100.0);
/// ```
pub fn resolve_price(product: &Product, plan: PaymentPlan) -> f64 {
    let one_time = product.price.unwrap_or(0.0);
    match plan {
        PaymentPlan::Monthly36 => product.price_36.unwrap_or(one_time),
        PaymentPlan::Monthly48 => product.price_48.unwrap_or(one_time),
        PaymentPlan::OneTime => one_time,
    }
}

/// Looks a line-item reference up in a catalog snapshot.
///
/// Matches by product name (the business key the wizard stores) or by
/// surrogate id. Returns `None` for unknown references; aggregation and
/// submission both skip those silently.
pub fn find_product<'a>(catalog: &'a [Product], reference: &str) -> Option<&'a Product> {
    catalog
        .iter()
        .find(|p| p.name == reference || p.id == reference)
}

// =============================================================================
// Totals
// =============================================================================

/// Per-category order totals.
///
/// Three named accumulators, one per recognized category bucket. Computed
/// fresh from the line items at submission time; the grand total is always
/// derived, never stored as a fourth field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    #[serde(rename = "OTC")]
    pub otc: f64,
    #[serde(rename = "Service")]
    pub service: f64,
    #[serde(rename = "OneTime")]
    pub one_time: f64,
}

impl Totals {
    /// All-zero totals.
    #[inline]
    pub const fn zero() -> Self {
        Totals {
            otc: 0.0,
            service: 0.0,
            one_time: 0.0,
        }
    }

    /// Creates totals with the given bucket values.
    #[inline]
    pub const fn new(otc: f64, service: f64, one_time: f64) -> Self {
        Totals {
            otc,
            service,
            one_time,
        }
    }

    /// Adds an amount to the bucket named by a category tag.
    ///
    /// Unrecognized tags are dropped - the amount lands in no bucket.
    pub fn add(&mut self, category_tag: &str, amount: f64) {
        match ProductCategory::from_tag(category_tag) {
            Some(ProductCategory::Otc) => self.otc += amount,
            Some(ProductCategory::Service) => self.service += amount,
            Some(ProductCategory::OneTime) => self.one_time += amount,
            None => {}
        }
    }

    /// Sum of all three buckets.
    #[inline]
    pub fn grand_total(&self) -> f64 {
        self.otc + self.service + self.one_time
    }

    /// Checks whether every bucket is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.otc == 0.0 && self.service == 0.0 && self.one_time == 0.0
    }
}

/// Display implementation for logs and debugging. UI formatting (currency
/// symbol, locale) is the caller's concern.
impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OTC {:.2} / Service {:.2} / One-time {:.2}",
            self.otc, self.service, self.one_time
        )
    }
}

/// Bucket-wise addition of two totals.
impl Add for Totals {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Totals {
            otc: self.otc + other.otc,
            service: self.service + other.service,
            one_time: self.one_time + other.one_time,
        }
    }
}

impl AddAssign for Totals {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.otc += other.otc;
        self.service += other.service;
        self.one_time += other.one_time;
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Computes per-category totals for a list of line items.
///
/// For each item the product is resolved from the catalog snapshot by name
/// or id; the resolved unit price times the quantity accumulates into the
/// bucket named by the product's category tag.
///
/// ## Skip Policy
/// - Unknown product references contribute nothing (validation already ran
///   earlier in the flow; this is a defensive fallback, not an error).
/// - Products with an unrecognized category tag contribute to no bucket.
///
/// Pure and deterministic: the result depends only on the items, the
/// catalog snapshot and the plan. Ordinary floating-point summation.
///
/// ## Example
/// ```rust
/// use telos_core::pricing::compute_totals;
/// use telos_core::types::{LineItem, PaymentPlan, Product};
///
/// let mut router = Product::new("Router");
/// router.price = Some(100.0);
/// router.price_36 = Some(4.0);
/// router.category = "OTC".to_string();
///
/// let items = vec![LineItem::new("Router", 2)];
/// let totals = compute_totals(&items, &[router], PaymentPlan::Monthly36);
/// assert_eq!(totals.otc, 8.0);
/// assert_eq!(totals.grand_total(), 8.0);
/// ```
pub fn compute_totals(items: &[LineItem], catalog: &[Product], plan: PaymentPlan) -> Totals {
    let mut totals = Totals::zero();

    for item in items {
        let Some(product) = find_product(catalog, &item.product_ref) else {
            continue;
        };

        let line_total = resolve_price(product, plan) * item.quantity as f64;
        Totals::add(&mut totals, &product.category, line_total);
    }

    totals
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(
        name: &str,
        price: Option<f64>,
        price_36: Option<f64>,
        price_48: Option<f64>,
        category: &str,
    ) -> Product {
        let mut p = Product::new(name);
        p.price = price;
        p.price_36 = price_36;
        p.price_48 = price_48;
        p.category = category.to_string();
        p
    }

    #[test]
    fn test_resolve_price_one_time() {
        let p = product("Router", Some(100.0), Some(4.0), Some(3.0), "OTC");
        assert_eq!(resolve_price(&p, PaymentPlan::OneTime), 100.0);
    }

    #[test]
    fn test_resolve_price_installment_plans() {
        let p = product("Router", Some(100.0), Some(4.0), Some(3.0), "OTC");
        assert_eq!(resolve_price(&p, PaymentPlan::Monthly36), 4.0);
        assert_eq!(resolve_price(&p, PaymentPlan::Monthly48), 3.0);
    }

    #[test]
    fn test_resolve_price_falls_back_to_one_time() {
        let p = product("Line", Some(49.9), None, None, "Service");
        assert_eq!(resolve_price(&p, PaymentPlan::Monthly36), 49.9);
        assert_eq!(resolve_price(&p, PaymentPlan::Monthly48), 49.9);
    }

    #[test]
    fn test_resolve_price_all_absent_is_zero() {
        let p = product("Setup", None, None, None, "One time");
        assert_eq!(resolve_price(&p, PaymentPlan::OneTime), 0.0);
        assert_eq!(resolve_price(&p, PaymentPlan::Monthly36), 0.0);
        assert_eq!(resolve_price(&p, PaymentPlan::Monthly48), 0.0);
    }

    #[test]
    fn test_resolve_price_never_negative_for_catalog() {
        let catalog = vec![
            product("A", Some(100.0), Some(4.0), None, "OTC"),
            product("B", None, None, Some(7.5), "Service"),
            product("C", None, None, None, "One time"),
        ];
        for p in &catalog {
            for plan in [
                PaymentPlan::OneTime,
                PaymentPlan::Monthly36,
                PaymentPlan::Monthly48,
            ] {
                assert!(resolve_price(p, plan) >= 0.0);
            }
        }
    }

    #[test]
    fn test_find_product_by_name_and_id() {
        let catalog = vec![product("Router", Some(100.0), None, None, "OTC")];
        let id = catalog[0].id.clone();

        assert!(find_product(&catalog, "Router").is_some());
        assert!(find_product(&catalog, &id).is_some());
        assert!(find_product(&catalog, "Modem").is_none());
    }

    /// The worked scenario: Router priced 100 / 4 / 3, plan 36, quantity 2.
    #[test]
    fn test_router_on_36_plan() {
        let catalog = vec![product("Router", Some(100.0), Some(4.0), Some(3.0), "OTC")];
        let items = vec![LineItem::new("Router", 2)];

        let totals = compute_totals(&items, &catalog, PaymentPlan::Monthly36);
        assert_eq!(totals.otc, 8.0);
        assert_eq!(totals.service, 0.0);
        assert_eq!(totals.one_time, 0.0);
    }

    #[test]
    fn test_totals_buckets_and_unknown_reference() {
        let catalog = vec![
            product("Router", Some(50.0), None, None, "OTC"),
            product("Support", Some(30.0), None, None, "Service"),
        ];
        let items = vec![
            LineItem::new("Router", 1),
            LineItem::new("Support", 1),
            LineItem::new("Ghost", 5), // unknown: contributes exactly 0
        ];

        let totals = compute_totals(&items, &catalog, PaymentPlan::OneTime);
        assert_eq!(totals, Totals::new(50.0, 30.0, 0.0));
        assert_eq!(totals.grand_total(), 80.0);
    }

    #[test]
    fn test_unknown_category_contributes_to_no_bucket() {
        let catalog = vec![product("Cable", Some(10.0), None, None, "Accessory")];
        let items = vec![LineItem::new("Cable", 3)];

        let totals = compute_totals(&items, &catalog, PaymentPlan::OneTime);
        assert!(totals.is_zero());
    }

    /// Aggregation equals the sum of per-item resolved totals over matched
    /// items; unmatched items contribute exactly zero.
    #[test]
    fn test_totals_sum_matches_per_item_sum() {
        let catalog = vec![
            product("A", Some(12.5), Some(0.5), None, "OTC"),
            product("B", Some(99.0), None, Some(2.75), "Service"),
            product("C", Some(7.0), None, None, "One time"),
        ];
        let items = vec![
            LineItem::new("A", 3),
            LineItem::new("B", 2),
            LineItem::new("C", 1),
            LineItem::new("missing", 9),
        ];

        for plan in [
            PaymentPlan::OneTime,
            PaymentPlan::Monthly36,
            PaymentPlan::Monthly48,
        ] {
            let totals = compute_totals(&items, &catalog, plan);
            let expected: f64 = items
                .iter()
                .filter_map(|i| {
                    find_product(&catalog, &i.product_ref)
                        .map(|p| resolve_price(p, plan) * i.quantity as f64)
                })
                .sum();
            assert_eq!(totals.grand_total(), expected);
        }
    }

    /// Pure function: identical inputs yield identical outputs.
    #[test]
    fn test_totals_idempotent() {
        let catalog = vec![product("A", Some(10.0), Some(1.0), None, "OTC")];
        let items = vec![LineItem::new("A", 4)];

        let first = compute_totals(&items, &catalog, PaymentPlan::Monthly36);
        let second = compute_totals(&items, &catalog, PaymentPlan::Monthly36);
        assert_eq!(first, second);
    }

    #[test]
    fn test_totals_arithmetic() {
        let a = Totals::new(10.0, 5.0, 1.0);
        let b = Totals::new(2.0, 0.0, 3.0);

        assert_eq!(a + b, Totals::new(12.0, 5.0, 4.0));

        let mut c = a;
        c += b;
        assert_eq!(c, Totals::new(12.0, 5.0, 4.0));
    }

    #[test]
    fn test_totals_display() {
        let t = Totals::new(50.0, 30.5, 0.0);
        assert_eq!(format!("{}", t), "OTC 50.00 / Service 30.50 / One-time 0.00");
    }

    #[test]
    fn test_totals_serde_bucket_names() {
        let t = Totals::new(50.0, 30.0, 0.0);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"OTC":50.0,"Service":30.0,"OneTime":0.0}"#);
    }
}
