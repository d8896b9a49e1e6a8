//! # Customer Repository
//!
//! Database operations for customers and their branches.
//!
//! ## Key Operations
//! - Lookup by tax id (the unique business key)
//! - Case-insensitive substring search on business name or tax id
//! - Customer and branch creation (ids assigned here)

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use telos_core::types::{Branch, Customer, NewCustomer};

const CUSTOMER_COLUMNS: &str = "id, business_name, tax_id, address, phone, email, \
     auth_name, auth_mobile, auth_email, business_type, internet_provider, \
     notes, is_multi_branch, created_at";

/// Repository for customer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CustomerRepository::new(pool);
///
/// let matches = repo.search("aroma").await?;
/// let customer = repo.get_by_tax_id("514412345").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists all customers, ordered by business name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM customers ORDER BY business_name",
            CUSTOMER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Finds a customer by tax id.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - No customer with this tax id
    pub async fn get_by_tax_id(&self, tax_id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM customers WHERE tax_id = ?1",
            CUSTOMER_COLUMNS
        ))
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Searches customers by business name or tax id.
    ///
    /// Case-insensitive substring match; an empty query lists everyone.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Customer>> {
        let query = query.trim();

        debug!(query = %query, "Searching customers");

        if query.is_empty() {
            return self.list().await;
        }

        let pattern = format!("%{}%", query.to_lowercase());

        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM customers \
             WHERE LOWER(business_name) LIKE ?1 OR LOWER(tax_id) LIKE ?1 \
             ORDER BY business_name",
            CUSTOMER_COLUMNS
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = customers.len(), "Search returned customers");
        Ok(customers)
    }

    /// Creates a customer record, assigning a fresh id.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - The stored record
    /// * `Err(DbError::UniqueViolation)` - Tax id already on record
    pub async fn create(&self, data: &NewCustomer) -> DbResult<Customer> {
        debug!(tax_id = %data.tax_id, "Creating customer");

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            business_name: data.name.clone(),
            tax_id: data.tax_id.clone(),
            address: data.address.clone(),
            phone: data.phone.clone(),
            email: data.email.clone(),
            auth_name: data.auth_name.clone(),
            auth_mobile: data.auth_mobile.clone(),
            auth_email: data.auth_email.clone(),
            business_type: data.business_type.clone(),
            internet_provider: data.internet_provider.clone(),
            notes: data.notes.clone(),
            is_multi_branch: data.is_multi_branch,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO customers ( \
                id, business_name, tax_id, address, phone, email, \
                auth_name, auth_mobile, auth_email, business_type, \
                internet_provider, notes, is_multi_branch, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&customer.id)
        .bind(&customer.business_name)
        .bind(&customer.tax_id)
        .bind(&customer.address)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.auth_name)
        .bind(&customer.auth_mobile)
        .bind(&customer.auth_email)
        .bind(&customer.business_type)
        .bind(&customer.internet_provider)
        .bind(&customer.notes)
        .bind(customer.is_multi_branch)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Creates a branch under a customer, assigning a fresh id.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Customer id doesn't exist
    pub async fn create_branch(
        &self,
        customer_id: &str,
        name: &str,
        address: &str,
    ) -> DbResult<Branch> {
        debug!(customer_id = %customer_id, name = %name, "Creating branch");

        let branch = Branch {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO branches (id, customer_id, name, address, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&branch.id)
        .bind(&branch.customer_id)
        .bind(&branch.name)
        .bind(&branch.address)
        .bind(branch.created_at)
        .execute(&self.pool)
        .await?;

        Ok(branch)
    }

    /// Lists a customer's branches, oldest first.
    pub async fn list_branches(&self, customer_id: &str) -> DbResult<Vec<Branch>> {
        let branches = sqlx::query_as::<_, Branch>(
            "SELECT id, customer_id, name, address, created_at \
             FROM branches WHERE customer_id = ?1 ORDER BY created_at",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(branches)
    }

    /// Counts customers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    fn new_customer(name: &str, tax_id: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            tax_id: tax_id.to_string(),
            address: "12 Herzl St, Tel Aviv".to_string(),
            phone: "03-5551234".to_string(),
            email: "billing@example.test".to_string(),
            auth_name: "Dana Levi".to_string(),
            auth_mobile: "050-5556789".to_string(),
            auth_email: "dana@example.test".to_string(),
            ..NewCustomer::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_tax_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let created = repo.create(&new_customer("Cafe Aroma", "514412345")).await.unwrap();
        assert!(!created.id.is_empty());

        let found = repo.get_by_tax_id("514412345").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.business_name, "Cafe Aroma");

        assert!(repo.get_by_tax_id("000000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_tax_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.create(&new_customer("First", "514412345")).await.unwrap();
        let err = repo
            .create(&new_customer("Second", "514412345"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.create(&new_customer("Cafe Aroma", "514412345")).await.unwrap();
        repo.create(&new_customer("Pizza Roma", "514499999")).await.unwrap();

        let by_name = repo.search("AROMA").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].business_name, "Cafe Aroma");

        let by_tax_id = repo.search("4999").await.unwrap();
        assert_eq!(by_tax_id.len(), 1);
        assert_eq!(by_tax_id[0].business_name, "Pizza Roma");

        // Empty query lists everyone
        assert_eq!(repo.search("  ").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_branches_belong_to_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let customer = repo.create(&new_customer("Chain", "514412345")).await.unwrap();

        repo.create_branch(&customer.id, "Downtown", "1 Main St").await.unwrap();
        repo.create_branch(&customer.id, "Harbor", "2 Port Rd").await.unwrap();

        let branches = repo.list_branches(&customer.id).await.unwrap();
        assert_eq!(branches.len(), 2);
        assert!(branches.iter().all(|b| b.customer_id == customer.id));
    }

    #[tokio::test]
    async fn test_branch_requires_existing_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let err = repo
            .create_branch("no-such-customer", "Downtown", "1 Main St")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
