//! Postgres-backed catalog store.
//!
//! Reads and writes the host's catalog tables directly:
//!
//! | Table | Used for |
//! |-------|----------|
//! | `part_partcategory` | category lookup / listing |
//! | `stock_stocklocation` | location lookup / listing / search |
//! | `part_part` | part creation |
//! | `stock_stockitem` | stock item creation |
//!
//! Tree listings use the host's nested-set columns (`tree_id`, `lft`).
//! Primary and foreign keys are `integer` columns; they are widened to `i64`
//! on read, and ids outside the `integer` range never match a row.
//!
//! ## Columns written
//!
//! The host declares its column defaults in the application, not in the
//! database, so inserts set every non-nullable column explicitly:
//!
//! | Table | Columns |
//! |-------|---------|
//! | `part_part` | `name`, `description`, `category_id`, `"IPN"`, `active`, `assembly`, `component`, `purchaseable`, `salable`, `trackable`, `testable`, `is_template`, `virtual`, `locked`, `minimum_stock`, `bom_checksum`, `barcode_data`, `barcode_hash`, `tree_id`, `lft`, `rght`, `level` |
//! | `stock_stockitem` | `part_id`, `location_id`, `quantity`, `status`, `delete_on_deplete`, `is_building`, `review_needed`, `serial_int`, `barcode_data`, `barcode_hash`, `purchase_price_currency`, `updated`, `tree_id`, `lft`, `rght`, `level` |
//!
//! Any other column must be nullable or carry a database default.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (integrity constraint) | class `23` (`23505`, `23503`, `23514`, ...) | `Integrity` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / Io / Other | N/A | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use bulkparts_catalog::{Category, Location, NewPart, NewStockItem, Part, StockItem};
use bulkparts_core::{CategoryId, LocationId, PartId, StockItemId};

use super::r#trait::{CatalogStore, CatalogTransaction, StoreError};

/// Postgres-backed catalog store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is `Send + Sync`. Each transaction
/// holds one pooled connection until it is committed, rolled back or dropped.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
    part_url_prefix: Option<String>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool, part_url_prefix: Option<String>) -> Self {
        Self {
            pool: Arc::new(pool),
            part_url_prefix,
        }
    }
}

const CATEGORY_COLUMNS: &str = "id, name, description, parent_id, pathstring";
const LOCATION_COLUMNS: &str = "id, name, description, parent_id, pathstring";

/// `StockStatus.OK` in the host.
const STOCK_STATUS_OK: i32 = 10;

/// Narrow an id to the host's `integer` key type.
fn db_id(id: i64) -> Option<i32> {
    i32::try_from(id).ok()
}

fn db_id_for_write(operation: &str, id: i64) -> Result<i32, StoreError> {
    db_id(id).ok_or_else(|| StoreError::Backend(format!("id {id} out of range in {operation}")))
}

fn read_id(row: &PgRow, column: &str) -> Result<i64, sqlx::Error> {
    row.try_get::<i32, _>(column).map(i64::from)
}

fn read_parent_id(row: &PgRow) -> Result<Option<i64>, sqlx::Error> {
    Ok(row.try_get::<Option<i32>, _>("parent_id")?.map(i64::from))
}

fn category_from_row(row: &PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: CategoryId::new(read_id(row, "id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        parent_id: read_parent_id(row)?.map(CategoryId::new),
        pathstring: row.try_get("pathstring")?,
    })
}

fn location_from_row(row: &PgRow) -> Result<Location, sqlx::Error> {
    Ok(Location {
        id: LocationId::new(read_id(row, "id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        parent_id: read_parent_id(row)?.map(LocationId::new),
        pathstring: row.try_get("pathstring")?,
    })
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self), fields(category_id = %id), err)]
    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let Some(key) = db_id(id.get()) else {
            return Ok(None);
        };

        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM part_partcategory WHERE id = $1"
        ))
        .bind(key)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("category", e))?;

        row.as_ref()
            .map(category_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("category", e))
    }

    #[instrument(skip(self), fields(location_id = %id), err)]
    async fn location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        let Some(key) = db_id(id.get()) else {
            return Ok(None);
        };

        let row = sqlx::query(&format!(
            "SELECT {LOCATION_COLUMNS} FROM stock_stocklocation WHERE id = $1"
        ))
        .bind(key)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("location", e))?;

        row.as_ref()
            .map(location_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("location", e))
    }

    #[instrument(skip(self), err)]
    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM part_partcategory ORDER BY tree_id, lft"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("categories", e))?;

        rows.iter()
            .map(category_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("categories", e))
    }

    #[instrument(skip(self), err)]
    async fn locations(&self) -> Result<Vec<Location>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {LOCATION_COLUMNS} FROM stock_stocklocation ORDER BY tree_id, lft"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("locations", e))?;

        rows.iter()
            .map(location_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("locations", e))
    }

    #[instrument(skip(self), err)]
    async fn search_locations(&self, needle: &str, limit: usize) -> Result<Vec<Location>, StoreError> {
        let pattern = format!("%{}%", escape_like(needle));
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {LOCATION_COLUMNS}
            FROM stock_stocklocation
            WHERE name ILIKE $1 ESCAPE '\'
            ORDER BY tree_id, lft
            LIMIT $2
            "#
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("search_locations", e))?;

        rows.iter()
            .map(location_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("search_locations", e))
    }

    async fn begin(&self) -> Result<Box<dyn CatalogTransaction>, StoreError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        Ok(Box::new(PostgresCatalogTransaction {
            tx: Some(tx),
            part_url_prefix: self.part_url_prefix.clone(),
        }))
    }
}

/// One database transaction. Dropping it unfinished rolls back.
struct PostgresCatalogTransaction {
    tx: Option<Transaction<'static, Postgres>>,
    part_url_prefix: Option<String>,
}

impl PostgresCatalogTransaction {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, StoreError> {
        self.tx.as_mut().ok_or(StoreError::TransactionClosed)
    }
}

#[async_trait]
impl CatalogTransaction for PostgresCatalogTransaction {
    #[instrument(skip(self, part), fields(name = %part.name), err)]
    async fn create_part(&mut self, part: NewPart) -> Result<Part, StoreError> {
        let category_id = db_id_for_write("create_part", part.category_id.get())?;
        let tx = self.tx()?;

        // Each new part is the root of its own nested-set tree.
        let id = sqlx::query(
            r#"
            INSERT INTO part_part (
                name, description, category_id, "IPN",
                active, assembly, component, purchaseable, salable, trackable, testable,
                is_template, "virtual", locked, minimum_stock,
                bom_checksum, barcode_data, barcode_hash,
                tree_id, lft, rght, level
            )
            VALUES (
                $1, $2, $3, $4,
                TRUE, FALSE, TRUE, TRUE, FALSE, FALSE, FALSE,
                FALSE, FALSE, FALSE, 0,
                '', '', '',
                (SELECT COALESCE(MAX(tree_id), 0) + 1 FROM part_part), 1, 2, 0
            )
            RETURNING id
            "#,
        )
        .bind(&part.name)
        .bind(&part.description)
        .bind(category_id)
        .bind(&part.ipn)
        .fetch_one(&mut **tx)
        .await
        .and_then(|row| read_id(&row, "id"))
        .map_err(|e| map_sqlx_error("create_part", e))?;

        let id = PartId::new(id);
        let url = self
            .part_url_prefix
            .as_ref()
            .map(|prefix| format!("{prefix}{id}/"));
        Ok(part.into_part(id, url))
    }

    #[instrument(skip(self, item), fields(part_id = %item.part_id, location_id = %item.location_id), err)]
    async fn create_stock_item(&mut self, item: NewStockItem) -> Result<StockItem, StoreError> {
        let part_id = db_id_for_write("create_stock_item", item.part_id.get())?;
        let location_id = db_id_for_write("create_stock_item", item.location_id.get())?;
        let quantity: Decimal = item.quantity;
        let tx = self.tx()?;

        let id = sqlx::query(
            r#"
            INSERT INTO stock_stockitem (
                part_id, location_id, quantity,
                status, delete_on_deplete, is_building, review_needed, serial_int,
                barcode_data, barcode_hash, purchase_price_currency, updated,
                tree_id, lft, rght, level
            )
            VALUES (
                $1, $2, $3,
                $4, TRUE, FALSE, FALSE, 0,
                '', '', '', CURRENT_DATE,
                (SELECT COALESCE(MAX(tree_id), 0) + 1 FROM stock_stockitem), 1, 2, 0
            )
            RETURNING id
            "#,
        )
        .bind(part_id)
        .bind(location_id)
        .bind(quantity)
        .bind(STOCK_STATUS_OK)
        .fetch_one(&mut **tx)
        .await
        .and_then(|row| read_id(&row, "id"))
        .map_err(|e| map_sqlx_error("create_stock_item", e))?;

        Ok(item.into_stock_item(StockItemId::new(id)))
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let tx = self.tx.take().ok_or(StoreError::TransactionClosed)?;
        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        let tx = self.tx.take().ok_or(StoreError::TransactionClosed)?;
        tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))
    }
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            // SQLSTATE class 23: integrity constraint violation.
            match db_err.code() {
                Some(code) if code.starts_with("23") => StoreError::Integrity(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
