//! # Order Submission
//!
//! Drives a validated order draft through the persistence gateway.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Submission Flow                                  │
//! │                                                                     │
//! │  OrderDraft (step: Submitting)                                      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Resolve customer (create when new)                                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Multi-branch? ── yes ──► persist new branches, then per branch     │
//! │       │                   IN ORDER: skip item-less branches,        │
//! │       │                   compute totals, create order + items      │
//! │       no                                                            │
//! │       ▼                                                             │
//! │  One order (selected branch or none), totals, items                 │
//! │       │                                                             │
//! │       ├── all gateway calls OK ──► draft.confirm() → Confirmed      │
//! │       └── gateway error ──► draft.fail(generic msg) → Failed,       │
//! │                             full detail logged, draft preserved     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! - No cross-branch atomicity: a later branch's failure leaves earlier
//!   branches' orders committed.
//! - Item inserts are best-effort: an unknown product reference or a
//!   failed insert is logged and skipped without rolling back the order.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use telos_core::draft::{CustomerSelection, DraftStep, OrderDraft};
use telos_core::error::DraftError;
use telos_core::pricing::{compute_totals, find_product, resolve_price};
use telos_core::types::{Customer, LineItem, Order, PaymentPlan, Product};

/// Generic user-facing message for a failed submission. Operators get the
/// full error in the logs; the user just retries.
const SUBMIT_RETRY_MESSAGE: &str = "could not save the order, please try again";

// =============================================================================
// Errors & Receipt
// =============================================================================

/// Errors from [`submit_draft`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The draft is not in the `Submitting` step.
    #[error("submission rejected: {0}")]
    Draft(#[from] DraftError),

    /// A gateway call failed; the draft has moved to `Failed` with all
    /// entered data preserved.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Summary of a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Customer the orders were filed under (freshly created when the
    /// draft carried a new customer).
    pub customer_id: String,
    /// Orders created, in branch order.
    pub orders: Vec<Order>,
    /// Line items persisted across all orders.
    pub items_written: usize,
    /// Line items dropped (unknown reference or failed insert).
    pub items_skipped: usize,
}

// =============================================================================
// Submission
// =============================================================================

/// Persists a validated draft and drives it to `Confirmed` or `Failed`.
///
/// The draft must be in [`DraftStep::Submitting`] (a passed `advance()`
/// from the items step). On success the draft is confirmed; on any gateway
/// error it moves to `Failed` with a generic retryable message and every
/// entered field intact.
pub async fn submit_draft(
    db: &Database,
    draft: &mut OrderDraft,
    catalog: &[Product],
) -> Result<SubmissionReceipt, SubmitError> {
    if draft.step() != DraftStep::Submitting {
        return Err(SubmitError::Draft(DraftError::InvalidTransition {
            from: draft.step(),
            action: "submit",
        }));
    }

    match persist(db, draft, catalog).await {
        Ok(receipt) => {
            let _ = draft.confirm();
            info!(
                customer_id = %receipt.customer_id,
                orders = receipt.orders.len(),
                items = receipt.items_written,
                skipped = receipt.items_skipped,
                "Order submission confirmed"
            );
            Ok(receipt)
        }
        Err(err) => {
            error!(error = %err, "Order submission failed");
            let _ = draft.fail(SUBMIT_RETRY_MESSAGE);
            Err(SubmitError::Db(err))
        }
    }
}

/// Runs the gateway calls. Pure persistence; draft state transitions stay
/// in [`submit_draft`].
async fn persist(
    db: &Database,
    draft: &OrderDraft,
    catalog: &[Product],
) -> DbResult<SubmissionReceipt> {
    let customer = resolve_customer(db, draft).await?;

    let mut receipt = SubmissionReceipt {
        customer_id: customer.id.clone(),
        orders: Vec::new(),
        items_written: 0,
        items_skipped: 0,
    };

    if draft.is_multi_branch() {
        // Branches are customer data: every new one is persisted, whether
        // or not it carries items this time around.
        for branch in &draft.branches {
            let branch_id = match &branch.id {
                Some(id) => id.clone(),
                None => {
                    db.customers()
                        .create_branch(&customer.id, &branch.name, &branch.address)
                        .await?
                        .id
                }
            };

            if !branch.items.iter().any(has_product_ref) {
                info!(branch = %branch.name, "Branch has no line items, skipping order");
                continue;
            }

            let order = create_order_with_items(
                db,
                &customer.id,
                Some(&branch_id),
                &branch.items,
                catalog,
                draft,
                &mut receipt,
            )
            .await?;
            receipt.orders.push(order);
        }
    } else {
        let order = create_order_with_items(
            db,
            &customer.id,
            draft.selected_branch.as_deref(),
            &draft.items,
            catalog,
            draft,
            &mut receipt,
        )
        .await?;
        receipt.orders.push(order);
    }

    Ok(receipt)
}

/// Resolves the draft's customer: looks an existing one up by tax id, or
/// creates the new record entered in the wizard.
async fn resolve_customer(db: &Database, draft: &OrderDraft) -> DbResult<Customer> {
    match &draft.customer {
        Some(CustomerSelection::Existing { tax_id, .. }) => db
            .customers()
            .get_by_tax_id(tax_id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", tax_id)),
        Some(CustomerSelection::New(data)) => db.customers().create(data).await,
        // Validation rules this out; kept as a defensive gateway error
        None => Err(DbError::not_found("Customer", "(none selected)")),
    }
}

/// Creates one order with freshly computed totals, then inserts its items
/// best-effort.
async fn create_order_with_items(
    db: &Database,
    customer_id: &str,
    branch_id: Option<&str>,
    items: &[LineItem],
    catalog: &[Product],
    draft: &OrderDraft,
    receipt: &mut SubmissionReceipt,
) -> DbResult<Order> {
    let totals = compute_totals(items, catalog, draft.plan);

    let order = db
        .orders()
        .create_order(customer_id, branch_id, draft.plan, totals, &draft.notes)
        .await?;

    debug!(
        payload = %serde_json::to_string(&order).unwrap_or_default(),
        "Order persisted"
    );

    let (written, skipped) = insert_items(db, &order.id, items, catalog, draft.plan).await;
    receipt.items_written += written;
    receipt.items_skipped += skipped;

    Ok(order)
}

/// Inserts an order's line items, skipping (and logging) unknown product
/// references and failed inserts. Returns `(written, skipped)`.
async fn insert_items(
    db: &Database,
    order_id: &str,
    items: &[LineItem],
    catalog: &[Product],
    plan: PaymentPlan,
) -> (usize, usize) {
    let mut written = 0;
    let mut skipped = 0;

    for item in items.iter().filter(|i| has_product_ref(i)) {
        let Some(product) = find_product(catalog, &item.product_ref) else {
            warn!(
                order_id = %order_id,
                product_ref = %item.product_ref,
                "Unknown product reference, skipping line item"
            );
            skipped += 1;
            continue;
        };

        let unit_price = resolve_price(product, plan);
        match db
            .orders()
            .create_item(order_id, &product.id, item.quantity, unit_price)
            .await
        {
            Ok(_) => written += 1,
            Err(err) => {
                warn!(
                    order_id = %order_id,
                    product_id = %product.id,
                    error = %err,
                    "Failed to insert line item, skipping"
                );
                skipped += 1;
            }
        }
    }

    (written, skipped)
}

fn has_product_ref(item: &LineItem) -> bool {
    !item.product_ref.trim().is_empty()
}

// =============================================================================
// Unit Tests
// =============================================================================
