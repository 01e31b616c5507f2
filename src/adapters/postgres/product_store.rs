//! PostgreSQL implementation of ProductStore.
//!
//! Products are keyed on `external_key`. The upsert fetches the existing
//! row first so it can report whether the sync actually changed anything;
//! the keyword search mirrors `ProductRecord::matches_any_token`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::catalog::{ProductRecord, ProductVariant, SyncSource};
use crate::domain::foundation::StoreError;
use crate::ports::{ProductStore, UpsertOutcome};

/// PostgreSQL implementation of ProductStore.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    /// Creates a new PostgresProductStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn upsert_by_external_key(
        &self,
        record: &ProductRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        let external_key = record
            .external_key
            .as_deref()
            .ok_or_else(|| StoreError::corrupt("upsert requires an external key"))?;

        let existing = self.find_by_external_key(external_key).await?;

        let variants = serde_json::to_value(&record.variants)
            .map_err(|e| StoreError::corrupt(format!("Failed to encode variants: {}", e)))?;

        match existing {
            Some(existing) if existing.same_content(record) => Ok(UpsertOutcome::Unchanged),
            Some(_) => {
                sqlx::query(
                    r#"
                    UPDATE products SET
                        name = $2,
                        description = $3,
                        price = $4,
                        category = $5,
                        tags = $6,
                        image = $7,
                        url = $8,
                        in_stock = $9,
                        quantity = $10,
                        rating = $11,
                        variants = $12,
                        source = $13,
                        synced_at = $14
                    WHERE external_key = $1
                    "#,
                )
                .bind(external_key)
                .bind(&record.name)
                .bind(&record.description)
                .bind(record.price)
                .bind(&record.category)
                .bind(&record.tags)
                .bind(&record.image)
                .bind(&record.url)
                .bind(record.in_stock)
                .bind(record.quantity)
                .bind(record.rating)
                .bind(variants)
                .bind(record.source.as_str())
                .bind(record.synced_at)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::database(format!("Failed to update product: {}", e)))?;

                Ok(UpsertOutcome::Updated)
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO products (
                        id, external_key, name, description, price, category,
                        tags, image, url, in_stock, quantity, rating, variants,
                        source, synced_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(external_key)
                .bind(&record.name)
                .bind(&record.description)
                .bind(record.price)
                .bind(&record.category)
                .bind(&record.tags)
                .bind(&record.image)
                .bind(&record.url)
                .bind(record.in_stock)
                .bind(record.quantity)
                .bind(record.rating)
                .bind(variants)
                .bind(record.source.as_str())
                .bind(record.synced_at)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::database(format!("Failed to insert product: {}", e)))?;

                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn find_by_external_key(
        &self,
        external_key: &str,
    ) -> Result<Option<ProductRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, external_key, name, description, price, category,
                   tags, image, url, in_stock, quantity, rating, variants,
                   source, synced_at
            FROM products
            WHERE external_key = $1
            "#,
        )
        .bind(external_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch product: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn search_keywords(
        &self,
        tokens: &[String],
        limit: usize,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let patterns: Vec<String> = tokens.iter().map(|t| format!("%{}%", t)).collect();
        let exact: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, external_key, name, description, price, category,
                   tags, image, url, in_stock, quantity, rating, variants,
                   source, synced_at
            FROM products
            WHERE in_stock
              AND (
                name ILIKE ANY($1)
                OR description ILIKE ANY($1)
                OR category ILIKE ANY($1)
                OR EXISTS (
                    SELECT 1 FROM unnest(tags) AS tag
                    WHERE lower(tag) = ANY($2)
                )
              )
            ORDER BY rating DESC
            LIMIT $3
            "#,
        )
        .bind(&patterns)
        .bind(&exact)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to search products: {}", e)))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::database(format!("Failed to count products: {}", e)))?;

        let n: i64 = row.get("n");
        Ok(n as u64)
    }
}

fn row_to_record(row: &PgRow) -> Result<ProductRecord, StoreError> {
    let variants_json: serde_json::Value = row.get("variants");
    let variants: Vec<ProductVariant> = serde_json::from_value(variants_json)
        .map_err(|e| StoreError::corrupt(format!("Invalid variants json: {}", e)))?;

    let source_str: &str = row.get("source");

    Ok(ProductRecord {
        id: Some(row.get("id")),
        external_key: row.get("external_key"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        category: row.get("category"),
        tags: row.get("tags"),
        image: row.get("image"),
        url: row.get("url"),
        in_stock: row.get("in_stock"),
        quantity: row.get("quantity"),
        rating: row.get("rating"),
        variants,
        source: str_to_source(source_str)?,
        synced_at: row.get("synced_at"),
    })
}

fn str_to_source(s: &str) -> Result<SyncSource, StoreError> {
    match s {
        "manual" => Ok(SyncSource::Manual),
        "shopify" => Ok(SyncSource::Shopify),
        _ => Err(StoreError::corrupt(format!("Invalid sync source: {}", s))),
    }
}
