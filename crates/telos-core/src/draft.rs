//! # Order Draft
//!
//! The in-progress state of an order being composed across the wizard's
//! steps, and the state machine that drives it.
//!
//! ## Step Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Order Wizard Steps                               │
//! │                                                                     │
//! │  Customer ──► Branches ──► Items ──► Submitting ──► Confirmed       │
//! │     │            ▲                       │                          │
//! │     │            │ (only when the        └──────────► Failed        │
//! │     └────────────┘  customer is                          │          │
//! │       skipped        multi-branch)        retry ◄────────┘          │
//! │                                                                     │
//! │  advance(): validates the current step (collect-all) and moves      │
//! │             forward; on failure the step does not change and the    │
//! │             error map is retained                                   │
//! │  back():    moves to the immediately preceding step, never          │
//! │             clearing entered data                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The draft itself is pure state: persistence happens in the database
//! layer, which drives `confirm()` / `fail()` after the gateway calls.

use serde::{Deserialize, Serialize};

use crate::error::DraftError;
use crate::types::{LineItem, NewCustomer, PaymentPlan};
use crate::validation::{
    validate_branch_items, validate_branches, validate_customer_step, validate_items,
    ValidationErrors,
};

// =============================================================================
// Steps
// =============================================================================

/// The wizard step a draft is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStep {
    /// Choosing an existing customer or entering a new one.
    Customer,
    /// Entering branch names and addresses (multi-branch customers only).
    Branches,
    /// Composing line items (per branch when multi-branch).
    Items,
    /// Validation passed; the gateway is persisting the order(s).
    Submitting,
    /// Everything persisted.
    Confirmed,
    /// A gateway call failed; all entered data is preserved for retry.
    Failed,
}

// =============================================================================
// Customer Selection
// =============================================================================

/// The customer half of a draft: an existing record or a new one being
/// created inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CustomerSelection {
    /// An existing customer, referenced by tax id.
    Existing {
        tax_id: String,
        /// Whether the selected record is flagged multi-branch (known to
        /// the caller from the catalog lookup).
        multi_branch: bool,
    },
    /// A new customer entered in the wizard.
    New(NewCustomer),
}

// =============================================================================
// Branch Draft
// =============================================================================

/// A branch row of the wizard, carrying its own item list.
///
/// Branches loaded from an existing customer carry their store id; branches
/// entered in the wizard have `id: None` until submission persists them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDraft {
    pub id: Option<String>,
    pub name: String,
    pub address: String,
    /// This branch's own line items. A branch with no items produces no
    /// order at submission.
    pub items: Vec<LineItem>,
}

impl BranchDraft {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        BranchDraft {
            id: None,
            name: name.into(),
            address: address.into(),
            items: Vec::new(),
        }
    }

    /// Wraps an existing branch record for use in a draft.
    pub fn existing(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        BranchDraft {
            id: Some(id.into()),
            name: name.into(),
            address: address.into(),
            items: Vec::new(),
        }
    }
}

// =============================================================================
// Order Draft
// =============================================================================

/// The accumulated state of the order wizard.
///
/// ## Invariants
/// - `step` only changes through `advance` / `back` / `confirm` / `fail`.
/// - A failed `advance` leaves the step unchanged and keeps the field-keyed
///   error map available through [`OrderDraft::errors`].
/// - Backward transitions never clear entered data.
/// - Totals are not stored on the draft; they are computed fresh at
///   submission from the line items and the catalog snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    step: DraftStep,

    /// Selected or newly entered customer. `None` until the user picks.
    pub customer: Option<CustomerSelection>,

    /// Branch rows (multi-branch flow only), each with its own items.
    pub branches: Vec<BranchDraft>,

    /// Single-branch line items.
    pub items: Vec<LineItem>,

    /// Existing branch chosen for a single order, by branch id.
    pub selected_branch: Option<String>,

    /// Payment plan applied to every item of the order.
    pub plan: PaymentPlan,

    /// Free-text order notes.
    pub notes: String,

    errors: ValidationErrors,
}

impl OrderDraft {
    /// A fresh draft: customer step, one blank item row, one-time plan.
    pub fn new() -> Self {
        OrderDraft {
            step: DraftStep::Customer,
            customer: None,
            branches: Vec::new(),
            items: vec![LineItem::default()],
            selected_branch: None,
            plan: PaymentPlan::OneTime,
            notes: String::new(),
            errors: ValidationErrors::new(),
        }
    }

    /// Current wizard step.
    pub fn step(&self) -> DraftStep {
        self.step
    }

    /// Field-keyed errors from the last failed transition (or the generic
    /// `submit` error after a failed submission).
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Whether this draft targets a multi-branch customer.
    pub fn is_multi_branch(&self) -> bool {
        match &self.customer {
            Some(CustomerSelection::New(customer)) => customer.is_multi_branch,
            Some(CustomerSelection::Existing { multi_branch, .. }) => *multi_branch,
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    /// Selects an existing customer by tax id.
    pub fn select_existing_customer(&mut self, tax_id: impl Into<String>, multi_branch: bool) {
        self.customer = Some(CustomerSelection::Existing {
            tax_id: tax_id.into(),
            multi_branch,
        });
    }

    /// Switches the draft to a new customer entered in the wizard.
    pub fn enter_new_customer(&mut self, customer: NewCustomer) {
        self.customer = Some(CustomerSelection::New(customer));
    }

    /// Appends a blank single-branch item row.
    pub fn add_item(&mut self) {
        self.items.push(LineItem::default());
    }

    /// Appends a blank branch row.
    pub fn add_branch(&mut self) {
        self.branches.push(BranchDraft::default());
    }

    /// Appends a blank item row to a branch.
    pub fn add_branch_item(&mut self, branch: usize) -> Result<(), DraftError> {
        let branch = self
            .branches
            .get_mut(branch)
            .ok_or(DraftError::UnknownBranch { index: branch })?;
        branch.items.push(LineItem::default());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Validates the current step and moves forward.
    ///
    /// On validation failure the step stays unchanged, the error map is
    /// stored (see [`OrderDraft::errors`]) and returned in the error.
    pub fn advance(&mut self) -> Result<DraftStep, DraftError> {
        let next = match self.step {
            DraftStep::Customer => {
                self.check(validate_customer_step(self.customer.as_ref()))?;
                if self.is_multi_branch() {
                    // Seed the branch step with one blank row, like the form does.
                    if self.branches.is_empty() {
                        self.branches.push(BranchDraft::default());
                    }
                    DraftStep::Branches
                } else {
                    DraftStep::Items
                }
            }
            DraftStep::Branches => {
                self.check(validate_branches(&self.branches))?;
                DraftStep::Items
            }
            DraftStep::Items => {
                let errors = if self.is_multi_branch() {
                    validate_branch_items(&self.branches)
                } else {
                    validate_items(&self.items)
                };
                self.check(errors)?;
                DraftStep::Submitting
            }
            from => {
                return Err(DraftError::InvalidTransition {
                    from,
                    action: "advance",
                })
            }
        };

        self.errors.clear();
        self.step = next;
        Ok(next)
    }

    /// Moves to the immediately preceding step without clearing any
    /// entered data. Returns `None` from the initial and terminal steps.
    pub fn back(&mut self) -> Option<DraftStep> {
        let previous = match self.step {
            DraftStep::Customer | DraftStep::Confirmed => return None,
            DraftStep::Branches => DraftStep::Customer,
            DraftStep::Items => {
                if self.is_multi_branch() {
                    DraftStep::Branches
                } else {
                    DraftStep::Customer
                }
            }
            DraftStep::Submitting | DraftStep::Failed => DraftStep::Items,
        };

        self.errors.clear();
        self.step = previous;
        Some(previous)
    }

    /// Marks the submission as persisted: `Submitting → Confirmed`.
    pub fn confirm(&mut self) -> Result<(), DraftError> {
        if self.step != DraftStep::Submitting {
            return Err(DraftError::InvalidTransition {
                from: self.step,
                action: "confirm",
            });
        }
        self.errors.clear();
        self.step = DraftStep::Confirmed;
        Ok(())
    }

    /// Marks the submission as failed: `Submitting → Failed`.
    ///
    /// Records a generic user-facing message under the `submit` key and
    /// preserves every entered field so the user can retry.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), DraftError> {
        if self.step != DraftStep::Submitting {
            return Err(DraftError::InvalidTransition {
                from: self.step,
                action: "fail",
            });
        }
        self.errors.insert("submit", message);
        self.step = DraftStep::Failed;
        Ok(())
    }

    fn check(&mut self, errors: ValidationErrors) -> Result<(), DraftError> {
        if errors.is_empty() {
            Ok(())
        } else {
            self.errors = errors.clone();
            Err(DraftError::Validation(errors))
        }
    }
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_customer(multi_branch: bool) -> NewCustomer {
        NewCustomer {
            name: "Cafe Aroma".to_string(),
            tax_id: "514412345".to_string(),
            address: "12 Herzl St, Tel Aviv".to_string(),
            phone: "03-5551234".to_string(),
            email: "billing@aroma.example".to_string(),
            auth_name: "Dana Levi".to_string(),
            auth_mobile: "050-5556789".to_string(),
            auth_email: "dana@aroma.example".to_string(),
            is_multi_branch: multi_branch,
            ..NewCustomer::default()
        }
    }

    #[test]
    fn test_single_branch_flow_skips_branch_step() {
        let mut draft = OrderDraft::new();
        draft.enter_new_customer(filled_customer(false));

        assert_eq!(draft.advance().unwrap(), DraftStep::Items);

        draft.items[0] = LineItem::new("Router", 2);
        assert_eq!(draft.advance().unwrap(), DraftStep::Submitting);

        draft.confirm().unwrap();
        assert_eq!(draft.step(), DraftStep::Confirmed);
    }

    #[test]
    fn test_multi_branch_flow_visits_branch_step() {
        let mut draft = OrderDraft::new();
        draft.enter_new_customer(filled_customer(true));

        assert_eq!(draft.advance().unwrap(), DraftStep::Branches);
        // The branch step was seeded with one blank row
        assert_eq!(draft.branches.len(), 1);

        draft.branches[0].name = "Downtown".to_string();
        draft.branches[0].address = "1 Main St".to_string();
        assert_eq!(draft.advance().unwrap(), DraftStep::Items);

        draft.add_branch_item(0).unwrap();
        draft.branches[0].items[0] = LineItem::new("Router", 1);
        assert_eq!(draft.advance().unwrap(), DraftStep::Submitting);
    }

    /// Blank `authEmail` blocks the customer step and the retained error
    /// map carries the `authEmail` key.
    #[test]
    fn test_blocked_customer_step_keeps_errors() {
        let mut draft = OrderDraft::new();
        let mut customer = filled_customer(false);
        customer.auth_email = String::new();
        draft.enter_new_customer(customer);

        let err = draft.advance().unwrap_err();
        assert_eq!(draft.step(), DraftStep::Customer);
        assert!(draft.errors().contains("authEmail"));
        match err {
            DraftError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_blocked_items_step() {
        let mut draft = OrderDraft::new();
        draft.enter_new_customer(filled_customer(false));
        draft.advance().unwrap();

        // Default row still blank
        let err = draft.advance().unwrap_err();
        assert!(matches!(err, DraftError::Validation(_)));
        assert_eq!(draft.step(), DraftStep::Items);
        assert!(draft.errors().contains("product-0"));
    }

    #[test]
    fn test_back_never_clears_data() {
        let mut draft = OrderDraft::new();
        draft.enter_new_customer(filled_customer(false));
        draft.advance().unwrap();
        draft.items[0] = LineItem::new("Router", 2);
        draft.notes = "install after 17:00".to_string();

        assert_eq!(draft.back(), Some(DraftStep::Customer));
        assert_eq!(draft.items[0].product_ref, "Router");
        assert_eq!(draft.notes, "install after 17:00");
        assert!(draft.customer.is_some());

        // Initial step has no predecessor
        assert_eq!(draft.back(), None);
    }

    #[test]
    fn test_failed_submission_preserves_draft() {
        let mut draft = OrderDraft::new();
        draft.enter_new_customer(filled_customer(false));
        draft.advance().unwrap();
        draft.items[0] = LineItem::new("Router", 2);
        draft.advance().unwrap();

        draft.fail("could not save the order, please retry").unwrap();
        assert_eq!(draft.step(), DraftStep::Failed);
        assert!(draft.errors().contains("submit"));
        assert_eq!(draft.items[0].product_ref, "Router");

        // Back returns to the items step for retry
        assert_eq!(draft.back(), Some(DraftStep::Items));
    }

    #[test]
    fn test_confirm_requires_submitting() {
        let mut draft = OrderDraft::new();
        let err = draft.confirm().unwrap_err();
        assert!(matches!(
            err,
            DraftError::InvalidTransition {
                from: DraftStep::Customer,
                ..
            }
        ));
    }

    #[test]
    fn test_add_branch_item_unknown_index() {
        let mut draft = OrderDraft::new();
        let err = draft.add_branch_item(3).unwrap_err();
        assert!(matches!(err, DraftError::UnknownBranch { index: 3 }));
    }
}
