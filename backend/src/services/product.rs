//! Shop product management

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Product;
use shared::validation::validate_non_negative_amount;

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for adding a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Option<String>,
}

/// Input for updating a product (restock / edit)
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    category: Option<String>,
    price: Decimal,
    stock: i32,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            name: r.name,
            category: r.category,
            price: r.price,
            stock: r.stock,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, category, price, stock, is_active, created_at, updated_at";

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List active products by name
    pub async fn list_active(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = TRUE ORDER BY name ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Add a new product
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("name", "Product name is required"));
        }
        validate_non_negative_amount(input.price)
            .map_err(|msg| AppError::validation("price", msg))?;
        if input.stock < 0 {
            return Err(AppError::validation("stock", "Stock must not be negative"));
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (name, category, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&name)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.stock)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update price/stock/category/active flag, keeping unspecified
    /// fields as they are
    pub async fn update(&self, id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        let existing = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let price = input.price.unwrap_or(existing.price);
        let stock = input.stock.unwrap_or(existing.stock);
        let category = input.category.or(existing.category);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        validate_non_negative_amount(price).map_err(|msg| AppError::validation("price", msg))?;
        if stock < 0 {
            return Err(AppError::validation("stock", "Stock must not be negative"));
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET price = $1, stock = $2, category = $3, is_active = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(price)
        .bind(stock)
        .bind(&category)
        .bind(is_active)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Soft delete: hide from the shop but keep sale history intact
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }
}
