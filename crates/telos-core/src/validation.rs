//! # Validation Module
//!
//! Field-keyed, collect-all input validation for the order wizard.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Wizard step validators (THIS MODULE)                      │
//! │  ├── Collect-all semantics: N invalid fields → N map entries        │
//! │  └── Field-keyed messages, rendered inline next to each input       │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: Database (SQLite)                                         │
//! │  ├── NOT NULL constraints                                           │
//! │  ├── UNIQUE constraints (tax id, product name)                      │
//! │  └── Foreign key constraints                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors are never raised through `Result` error channels.
//! Every validator returns a [`ValidationErrors`] map so the wizard can
//! display all problems of a step at once and keep the session usable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::draft::{BranchDraft, CustomerSelection};
use crate::types::{LineItem, NewCustomer};
use crate::MAX_BRANCHES;

// =============================================================================
// Error Map
// =============================================================================

/// A field-keyed map of validation messages.
///
/// Keys mirror the form field names (`name`, `authEmail`,
/// `branchName-0`, `product-2`, ...). A `BTreeMap` keeps iteration order
/// deterministic for display and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// An empty error map.
    pub fn new() -> Self {
        ValidationErrors(BTreeMap::new())
    }

    /// Records a message under a field key, replacing any earlier message
    /// for the same field.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Returns the message recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Checks whether a field has a recorded message.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields with messages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(field, message)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Removes every recorded message.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Records a "required" message when a value is blank.
fn require(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

// =============================================================================
// Step Validators
// =============================================================================

/// Validates the customer step.
///
/// Requires either an existing-customer reference or a fully filled
/// new-customer record. `None` (nothing chosen yet) and an existing
/// selection with a blank tax id both report under the `customer` key.
pub fn validate_customer_step(selection: Option<&CustomerSelection>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match selection {
        None => {
            errors.insert(
                "customer",
                "select an existing customer or enter a new one",
            );
        }
        Some(CustomerSelection::Existing { tax_id, .. }) => {
            require(
                &mut errors,
                "customer",
                tax_id,
                "select an existing customer or enter a new one",
            );
        }
        Some(CustomerSelection::New(customer)) => {
            errors = validate_new_customer(customer);
        }
    }

    errors
}

/// Validates a new-customer record.
///
/// All signatory and contact fields are required; business type, internet
/// provider and notes are optional.
pub fn validate_new_customer(customer: &NewCustomer) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    require(&mut errors, "name", &customer.name, "business name is required");
    require(&mut errors, "taxId", &customer.tax_id, "tax id is required");
    require(&mut errors, "address", &customer.address, "address is required");
    require(&mut errors, "phone", &customer.phone, "phone number is required");
    require(&mut errors, "email", &customer.email, "billing email is required");
    require(
        &mut errors,
        "authName",
        &customer.auth_name,
        "authorized signatory name is required",
    );
    require(
        &mut errors,
        "authMobile",
        &customer.auth_mobile,
        "authorized signatory mobile is required",
    );
    require(
        &mut errors,
        "authEmail",
        &customer.auth_email,
        "authorized signatory email is required",
    );

    errors
}

/// Validates the branch step of a multi-branch draft.
///
/// Every branch needs a non-empty name and address; all branches are
/// checked before reporting (collect-all, not fail-fast).
pub fn validate_branches(branches: &[BranchDraft]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if branches.is_empty() {
        errors.insert("branches", "at least one branch is required");
        return errors;
    }

    if branches.len() > MAX_BRANCHES {
        errors.insert(
            "branches",
            format!("no more than {} branches per order", MAX_BRANCHES),
        );
    }

    for (index, branch) in branches.iter().enumerate() {
        require(
            &mut errors,
            &format!("branchName-{}", index),
            &branch.name,
            "branch name is required",
        );
        require(
            &mut errors,
            &format!("branchAddress-{}", index),
            &branch.address,
            "branch address is required",
        );
    }

    errors
}

/// Validates a single-branch item list.
///
/// Every row must reference a product and carry quantity >= 1, keyed per
/// item index.
pub fn validate_items(items: &[LineItem]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if items.is_empty() {
        errors.insert("items", "at least one line item is required");
        return errors;
    }

    for (index, item) in items.iter().enumerate() {
        require(
            &mut errors,
            &format!("product-{}", index),
            &item.product_ref,
            "select a product",
        );
        if item.quantity < 1 {
            errors.insert(
                format!("quantity-{}", index),
                "quantity must be at least 1",
            );
        }
    }

    errors
}

/// Validates the per-branch item lists of a multi-branch draft.
///
/// Item rows that exist must be valid (keyed
/// `branch-{b}-product-{i}` / `branch-{b}-quantity-{i}`); branches may
/// carry empty lists, but at least one branch must have a product-bearing
/// line item for the order to proceed.
pub fn validate_branch_items(branches: &[BranchDraft]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let mut any_valid_item = false;
    for (b, branch) in branches.iter().enumerate() {
        for (i, item) in branch.items.iter().enumerate() {
            require(
                &mut errors,
                &format!("branch-{}-product-{}", b, i),
                &item.product_ref,
                "select a product",
            );
            if item.quantity < 1 {
                errors.insert(
                    format!("branch-{}-quantity-{}", b, i),
                    "quantity must be at least 1",
                );
            }
            if !item.product_ref.trim().is_empty() && item.quantity >= 1 {
                any_valid_item = true;
            }
        }
    }

    if !any_valid_item {
        errors.insert("items", "at least one branch needs a line item");
    }

    errors
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_customer() -> NewCustomer {
        NewCustomer {
            name: "Cafe Aroma".to_string(),
            tax_id: "514412345".to_string(),
            address: "12 Herzl St, Tel Aviv".to_string(),
            phone: "03-5551234".to_string(),
            email: "billing@aroma.example".to_string(),
            auth_name: "Dana Levi".to_string(),
            auth_mobile: "050-5556789".to_string(),
            auth_email: "dana@aroma.example".to_string(),
            ..NewCustomer::default()
        }
    }

    #[test]
    fn test_nothing_selected_reports_customer_key() {
        let errors = validate_customer_step(None);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("customer"));
    }

    #[test]
    fn test_existing_selection_with_blank_tax_id() {
        let selection = CustomerSelection::Existing {
            tax_id: "  ".to_string(),
            multi_branch: false,
        };
        let errors = validate_customer_step(Some(&selection));
        assert!(errors.contains("customer"));
    }

    #[test]
    fn test_filled_new_customer_passes() {
        let errors = validate_new_customer(&filled_customer());
        assert!(errors.is_empty());
    }

    /// Collect-all: a record with N blank required fields yields exactly N
    /// entries, not just the first.
    #[test]
    fn test_collects_all_missing_fields() {
        let errors = validate_new_customer(&NewCustomer::default());
        assert_eq!(errors.len(), 8);
        for key in [
            "name", "taxId", "address", "phone", "email", "authName", "authMobile", "authEmail",
        ] {
            assert!(errors.contains(key), "missing key {}", key);
        }
    }

    #[test]
    fn test_blank_auth_email_is_keyed_auth_email() {
        let mut customer = filled_customer();
        customer.auth_email = String::new();

        let errors = validate_new_customer(&customer);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("authEmail"),
            Some("authorized signatory email is required")
        );
    }

    #[test]
    fn test_branches_keyed_per_index() {
        let branches = vec![
            BranchDraft::new("Downtown", "1 Main St"),
            BranchDraft::new("", ""),
        ];
        let errors = validate_branches(&branches);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("branchName-1"));
        assert!(errors.contains("branchAddress-1"));
    }

    #[test]
    fn test_no_branches_at_all() {
        let errors = validate_branches(&[]);
        assert!(errors.contains("branches"));
    }

    #[test]
    fn test_too_many_branches() {
        let branches: Vec<BranchDraft> = (0..MAX_BRANCHES + 1)
            .map(|i| BranchDraft::new(format!("Branch {}", i), format!("{} Main St", i)))
            .collect();
        let errors = validate_branches(&branches);
        assert!(errors.contains("branches"));
    }

    #[test]
    fn test_items_keyed_per_index() {
        let items = vec![
            LineItem::new("Router", 2),
            LineItem::new("", 1),
            LineItem::new("Modem", 0),
        ];
        let errors = validate_items(&items);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("product-1"));
        assert!(errors.contains("quantity-2"));
    }

    #[test]
    fn test_branch_items_require_one_valid_row() {
        let mut a = BranchDraft::new("A", "addr a");
        a.items.push(LineItem::new("Router", 1));
        let b = BranchDraft::new("B", "addr b"); // empty list is fine

        assert!(validate_branch_items(&[a, b.clone()]).is_empty());

        // No branch has any row at all
        let errors = validate_branch_items(&[b]);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("items"));
    }

    #[test]
    fn test_branch_items_keyed_per_branch_and_index() {
        let mut a = BranchDraft::new("A", "addr a");
        a.items.push(LineItem::new("Router", 1));
        let mut b = BranchDraft::new("B", "addr b");
        b.items.push(LineItem::new("", 0));

        let errors = validate_branch_items(&[a, b]);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("branch-1-product-0"));
        assert!(errors.contains("branch-1-quantity-0"));
    }

    #[test]
    fn test_error_map_display() {
        let mut errors = ValidationErrors::new();
        errors.insert("name", "business name is required");
        errors.insert("taxId", "tax id is required");
        assert_eq!(
            errors.to_string(),
            "name: business name is required; taxId: tax id is required"
        );
    }
}
