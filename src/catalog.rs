//! Catalog reads: products joined with inventory

use crate::models::{Product, ProductStock};
use sqlx::PgPool;
use uuid::Uuid;

/// Read-side manager for product and stock lookups
pub struct ProductManager;

impl ProductManager {
    /// Resolve a set of product ids to active products plus their stock
    /// counters, in one query.
    ///
    /// Inactive or unknown ids are simply absent from the result; the
    /// caller compares result size against the distinct id count to
    /// decide availability of the whole cart.
    pub async fn load_for_checkout(
        pool: &PgPool,
        product_ids: &[Uuid],
    ) -> Result<Vec<ProductStock>, sqlx::Error> {
        let rows: Vec<ProductStock> = sqlx::query_as(
            r#"SELECT p.product_id, p.sku, p.name, p.price,
                      COALESCE(i.quantity, 0) AS quantity,
                      COALESCE(i.reserved_qty, 0) AS reserved_qty
               FROM products_tb p
               LEFT JOIN inventory_tb i ON i.product_id = p.product_id
               WHERE p.product_id = ANY($1) AND p.is_active"#,
        )
        .bind(product_ids)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Get a product by id regardless of active flag
    pub async fn get_by_id(pool: &PgPool, product_id: Uuid) -> Result<Option<Product>, sqlx::Error> {
        let row: Option<Product> = sqlx::query_as(
            r#"SELECT product_id, sku, slug, name, oem_number, price, is_active
               FROM products_tb WHERE product_id = $1"#,
        )
        .bind(product_id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }
}
