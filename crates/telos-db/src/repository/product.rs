//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Case-insensitive substring search on name or product type
//! - Category filtering for the catalog browser
//! - Lookup by name (the business key line items reference)

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use telos_core::types::Product;

const PRODUCT_COLUMNS: &str =
    "id, name, price, price_36, price_48, description, product_type, category, created_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let results = repo.search("router").await?;
/// let otc = repo.by_category("OTC").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the whole catalog, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products ORDER BY name",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Searches products by name or product type.
    ///
    /// Case-insensitive substring match; an empty query lists the whole
    /// catalog.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, "Searching products");

        if query.is_empty() {
            return self.list().await;
        }

        let pattern = format!("%{}%", query.to_lowercase());

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products \
             WHERE LOWER(name) LIKE ?1 OR LOWER(product_type) LIKE ?1 \
             ORDER BY name",
            PRODUCT_COLUMNS
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists products carrying a category tag (exact match).
    pub async fn by_category(&self, category: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE category = ?1 ORDER BY name",
            PRODUCT_COLUMNS
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its unique name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE name = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored record
    /// * `Err(DbError::UniqueViolation)` - Name already in the catalog
    pub async fn create(&self, product: &Product) -> DbResult<Product> {
        debug!(name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                id, name, price, price_36, price_48, \
                description, product_type, category, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.price_36)
        .bind(product.price_48)
        .bind(&product.description)
        .bind(&product.product_type)
        .bind(&product.category)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Counts catalog products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
