//! # Order Repository
//!
//! Database operations for orders and order items.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                               │
//! │                                                                     │
//! │  1. CREATE                                                          │
//! │     └── create_order() → Order { status: Pending }                  │
//! │         Totals arrive precomputed from the aggregation; they are    │
//! │         derived data and never edited afterwards.                   │
//! │                                                                     │
//! │  2. ADD ITEMS                                                       │
//! │     └── create_item() → OrderItem (unit price frozen)               │
//! │                                                                     │
//! │  3. WORK THE BOARD                                                  │
//! │     └── list_by_status(Pending) → active board                      │
//! │     └── set_status(Completed) → completed board                     │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use telos_core::pricing::Totals;
use telos_core::types::{Order, OrderItem, OrderStatus, PaymentPlan};

const ORDER_COLUMNS: &str = "id, customer_id, branch_id, payment_plan, \
     otc_total, service_total, one_time_total, notes, status, created_at";

/// Flat row shape of the `orders` table.
///
/// Plan and status travel as text tags and the totals as three columns;
/// [`Order`] carries the typed versions, so reads go through this row.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    customer_id: String,
    branch_id: Option<String>,
    payment_plan: String,
    otc_total: f64,
    service_total: f64,
    one_time_total: f64,
    notes: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            customer_id: row.customer_id,
            branch_id: row.branch_id,
            // Tags parse leniently: unknown plan reads as one-time,
            // unknown status as pending
            payment_plan: PaymentPlan::from_tag(&row.payment_plan),
            totals: Totals::new(row.otc_total, row.service_total, row.one_time_total),
            notes: row.notes,
            status: OrderStatus::from_tag(&row.status),
            created_at: row.created_at,
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order with precomputed totals, assigning a fresh id.
    ///
    /// Status starts as [`OrderStatus::Pending`].
    ///
    /// ## Arguments
    /// * `branch_id` - Branch the order installs at; `None` for
    ///   single-location customers
    /// * `totals` - Per-category totals computed from the line items under
    ///   `plan`
    pub async fn create_order(
        &self,
        customer_id: &str,
        branch_id: Option<&str>,
        plan: PaymentPlan,
        totals: Totals,
        notes: &str,
    ) -> DbResult<Order> {
        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            branch_id: branch_id.map(str::to_string),
            payment_plan: plan,
            totals,
            notes: notes.to_string(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        debug!(id = %order.id, customer_id = %customer_id, totals = %totals, "Creating order");

        sqlx::query(
            "INSERT INTO orders ( \
                id, customer_id, branch_id, payment_plan, \
                otc_total, service_total, one_time_total, \
                notes, status, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&order.id)
        .bind(&order.customer_id)
        .bind(&order.branch_id)
        .bind(order.payment_plan.as_str())
        .bind(order.totals.otc)
        .bind(order.totals.service)
        .bind(order.totals.one_time)
        .bind(&order.notes)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    /// Adds a line item to an order, assigning a fresh id.
    ///
    /// The unit price is whatever the submission resolved under the order's
    /// plan; it stays frozen even if the catalog changes later.
    pub async fn create_item(
        &self,
        order_id: &str,
        product_id: &str,
        quantity: i64,
        unit_price: f64,
    ) -> DbResult<OrderItem> {
        debug!(order_id = %order_id, product_id = %product_id, "Adding order item");

        let item = OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
            unit_price,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, quantity, unit_price, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&item.id)
        .bind(&item.order_id)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = ?1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Gets all items of an order, oldest first.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, unit_price, created_at \
             FROM order_items WHERE order_id = ?1 ORDER BY created_at",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists orders on a status board, newest first.
    pub async fn list_by_status(&self, status: OrderStatus) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE status = ?1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Lists a customer's orders, newest first.
    pub async fn list_by_customer(&self, customer_id: &str) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE customer_id = ?1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Moves an order to a status board.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No order with this id
    pub async fn set_status(&self, order_id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(order_id = %order_id, status = %status.as_str(), "Updating order status");

        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(order_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
