//! Repository for the `items` table.
//!
//! The store has no per-item write path: clients push their entire item
//! collection and [`ItemRepo::replace_all`] swaps the table contents inside a
//! single transaction.

use devsnippet_core::item::Item;
use sqlx::PgPool;

use crate::models::item::{ItemColumns, ItemRow};

/// Column list for `items` queries.
const COLUMNS: &str = "\
    id, title, content, description, category, tags, language, \
    registry_path, registry_name, registry_type, created_at, updated_at";

/// Provides read and bulk-replace operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// All items, most recently updated first (ties broken by id).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items ORDER BY updated_at DESC, id");
        let rows = sqlx::query_as::<_, ItemRow>(&query)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(Item::try_from).collect()
    }

    /// Items with the given ids, in list order. Unknown ids are ignored.
    pub async fn find_by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<Item>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let query = format!(
            "SELECT {COLUMNS} FROM items WHERE id = ANY($1) ORDER BY updated_at DESC, id"
        );
        let rows = sqlx::query_as::<_, ItemRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(Item::try_from).collect()
    }

    /// Replace the entire table with `items`.
    ///
    /// Deletes every row and bulk-inserts the new set in one transaction. If
    /// any statement fails the transaction is dropped uncommitted, which rolls
    /// it back and leaves the previous contents in place. Returns the number of
    /// rows inserted.
    pub async fn replace_all(pool: &PgPool, items: &[Item]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM items")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let cols = ItemColumns::from_items(items);
        let inserted = if cols.is_empty() {
            0
        } else {
            sqlx::query(
                "INSERT INTO items \
                    (id, title, content, description, category, tags, language, \
                     registry_path, registry_name, registry_type, created_at, updated_at) \
                 SELECT * FROM UNNEST(\
                    $1::text[], $2::text[], $3::text[], $4::text[], $5::text[], $6::jsonb[], \
                    $7::text[], $8::text[], $9::text[], $10::text[], $11::bigint[], $12::bigint[])",
            )
            .bind(&cols.ids)
            .bind(&cols.titles)
            .bind(&cols.contents)
            .bind(&cols.descriptions)
            .bind(&cols.categories)
            .bind(&cols.tags)
            .bind(&cols.languages)
            .bind(&cols.registry_paths)
            .bind(&cols.registry_names)
            .bind(&cols.registry_types)
            .bind(&cols.created_ats)
            .bind(&cols.updated_ats)
            .execute(&mut *tx)
            .await?
            .rows_affected()
        };

        tx.commit().await?;

        tracing::debug!(deleted, inserted, "Replaced item set");
        Ok(inserted)
    }

    /// Number of stored items.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
