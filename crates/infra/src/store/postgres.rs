//! Postgres-backed inventory store.
//!
//! Two tables share one pool:
//!
//! - `qm_users`: one row per registered user (the actor directory)
//! - `qm_inventory_items`: one row per `(user_id, item_key)`; metadata is JSONB
//!
//! Keys are stored in the case the domain chose and compared exactly. Renames run
//! inside one transaction, so readers never see both keys or neither.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use quartermaster_core::{ActorReference, UserId};
use quartermaster_inventory::{Inventory, InventoryEntry};

use super::r#trait::{ActorDirectory, InventoryStore, StoreError, UserProfile};

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS qm_users (
    user_id       TEXT PRIMARY KEY,
    display_name  TEXT NOT NULL,
    registered_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_ITEMS: &str = r#"
CREATE TABLE IF NOT EXISTS qm_inventory_items (
    user_id    TEXT NOT NULL,
    item_key   TEXT NOT NULL,
    quantity   BIGINT NOT NULL CHECK (quantity > 0),
    metadata   JSONB NOT NULL DEFAULT '{}'::jsonb,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (user_id, item_key)
)
"#;

const UPSERT_ITEM: &str = r#"
INSERT INTO qm_inventory_items (user_id, item_key, quantity, metadata)
VALUES ($1, $2, $3, $4)
ON CONFLICT (user_id, item_key)
DO UPDATE SET
    quantity = EXCLUDED.quantity,
    metadata = EXCLUDED.metadata,
    updated_at = NOW()
"#;

const DELETE_ITEM: &str = "DELETE FROM qm_inventory_items WHERE user_id = $1 AND item_key = $2";

#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` with a default pool.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the tables if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for (operation, ddl) in [("create_users", CREATE_USERS), ("create_items", CREATE_ITEMS)] {
            sqlx::query(ddl)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error(operation, e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    #[instrument(skip(self), fields(user_id = %user, item_count = tracing::field::Empty), err)]
    async fn get_all(&self, user: &UserId) -> Result<Inventory, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT item_key, quantity, metadata
            FROM qm_inventory_items
            WHERE user_id = $1
            ORDER BY item_key ASC
            "#,
        )
        .bind(user.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_all", e))?;

        let mut inventory = Inventory::new();
        for row in rows {
            let key: String = row
                .try_get("item_key")
                .map_err(|e| StoreError::Corrupt(format!("item_key: {e}")))?;
            inventory.insert(key, entry_from_row(&row)?);
        }

        Span::current().record("item_count", inventory.len());
        Ok(inventory)
    }

    #[instrument(skip(self), fields(user_id = %user), err)]
    async fn get_one(
        &self,
        user: &UserId,
        key: &str,
    ) -> Result<Option<InventoryEntry>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT quantity, metadata
            FROM qm_inventory_items
            WHERE user_id = $1 AND item_key = $2
            "#,
        )
        .bind(user.as_str())
        .bind(key)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_one", e))?;

        row.as_ref().map(entry_from_row).transpose()
    }

    #[instrument(skip(self, entry), fields(user_id = %user, quantity = entry.quantity), err)]
    async fn set(
        &self,
        user: &UserId,
        key: &str,
        entry: &InventoryEntry,
    ) -> Result<(), StoreError> {
        sqlx::query(UPSERT_ITEM)
            .bind(user.as_str())
            .bind(key)
            .bind(quantity_to_db(entry.quantity)?)
            .bind(metadata_to_db(entry)?)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("set", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user), err)]
    async fn update_quantity(
        &self,
        user: &UserId,
        key: &str,
        quantity: u64,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE qm_inventory_items
            SET quantity = $3, updated_at = NOW()
            WHERE user_id = $1 AND item_key = $2
            "#,
        )
        .bind(user.as_str())
        .bind(key)
        .bind(quantity_to_db(quantity)?)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_quantity", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user), err)]
    async fn delete(&self, user: &UserId, key: &str) -> Result<(), StoreError> {
        sqlx::query(DELETE_ITEM)
            .bind(user.as_str())
            .bind(key)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(())
    }

    #[instrument(skip(self, entry), fields(user_id = %user), err)]
    async fn replace(
        &self,
        user: &UserId,
        from: &str,
        to: &str,
        entry: &InventoryEntry,
    ) -> Result<(), StoreError> {
        let quantity = quantity_to_db(entry.quantity)?;
        let metadata = metadata_to_db(entry)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(DELETE_ITEM)
            .bind(user.as_str())
            .bind(from)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("replace_delete", e))?;

        sqlx::query(UPSERT_ITEM)
            .bind(user.as_str())
            .bind(to)
            .bind(quantity)
            .bind(metadata)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("replace_insert", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }
}

#[async_trait]
impl ActorDirectory for PostgresInventoryStore {
    #[instrument(skip(self), fields(user_id = %user), err)]
    async fn register(&self, user: &UserId, display_name: &str) -> Result<UserProfile, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO qm_users (user_id, display_name)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET display_name = EXCLUDED.display_name
            RETURNING user_id, display_name, registered_at
            "#,
        )
        .bind(user.as_str())
        .bind(display_name)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("register", e))?;

        profile_from_row(&row)
    }

    #[instrument(skip(self), fields(user_id = %user), err)]
    async fn profile(&self, user: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let row = sqlx::query(
            "SELECT user_id, display_name, registered_at FROM qm_users WHERE user_id = $1",
        )
        .bind(user.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("profile", e))?;

        row.as_ref().map(profile_from_row).transpose()
    }

    #[instrument(skip(self), fields(actor_count = tracing::field::Empty), err)]
    async fn list_all(&self) -> Result<Vec<ActorReference>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, display_name, registered_at
            FROM qm_users
            ORDER BY registered_at ASC, user_id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_all", e))?;

        let actors = rows
            .iter()
            .map(|row| profile_from_row(row).map(|p| p.actor_reference()))
            .collect::<Result<Vec<_>, _>>()?;

        Span::current().record("actor_count", actors.len());
        Ok(actors)
    }
}

fn entry_from_row(row: &sqlx::postgres::PgRow) -> Result<InventoryEntry, StoreError> {
    let quantity: i64 = row
        .try_get("quantity")
        .map_err(|e| StoreError::Corrupt(format!("quantity: {e}")))?;
    let metadata: serde_json::Value = row
        .try_get("metadata")
        .map_err(|e| StoreError::Corrupt(format!("metadata: {e}")))?;

    let quantity = u64::try_from(quantity)
        .map_err(|_| StoreError::Corrupt(format!("negative quantity {quantity}")))?;
    let metadata: BTreeMap<String, serde_json::Value> = serde_json::from_value(metadata)
        .map_err(|e| StoreError::Corrupt(format!("metadata is not an object: {e}")))?;

    Ok(InventoryEntry { quantity, metadata })
}

fn profile_from_row(row: &sqlx::postgres::PgRow) -> Result<UserProfile, StoreError> {
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| StoreError::Corrupt(format!("user_id: {e}")))?;
    let display_name: String = row
        .try_get("display_name")
        .map_err(|e| StoreError::Corrupt(format!("display_name: {e}")))?;
    let registered_at: DateTime<Utc> = row
        .try_get("registered_at")
        .map_err(|e| StoreError::Corrupt(format!("registered_at: {e}")))?;

    Ok(UserProfile {
        user_id: UserId::new(user_id).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        display_name,
        registered_at,
    })
}

fn quantity_to_db(quantity: u64) -> Result<i64, StoreError> {
    i64::try_from(quantity)
        .map_err(|_| StoreError::Backend(format!("quantity {quantity} exceeds BIGINT range")))
}

fn metadata_to_db(entry: &InventoryEntry) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(&entry.metadata)
        .map_err(|e| StoreError::Backend(format!("metadata serialization: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Backend(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(format!("decode error in {}: {}", operation, err))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs only against a live database: `DATABASE_URL=... cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn rename_is_visible_atomically_against_live_postgres() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let store = PostgresInventoryStore::connect(&url).await.unwrap();
        store.ensure_schema().await.unwrap();

        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or(0);
        let user = UserId::new(format!("test-{stamp}")).unwrap();
        store.register(&user, "Tester").await.unwrap();
        store.set(&user, "potions", &InventoryEntry::new(2)).await.unwrap();
        store
            .replace(&user, "potions", "potion", &InventoryEntry::new(1))
            .await
            .unwrap();

        let inv = store.get_all(&user).await.unwrap();
        assert_eq!(inv.keys().collect::<Vec<_>>(), vec!["potion"]);
        assert!(store.profile(&user).await.unwrap().is_some());

        store.delete(&user, "potion").await.unwrap();
        assert!(store.get_all(&user).await.unwrap().is_empty());
    }

    #[test]
    fn oversized_quantities_are_rejected_before_hitting_the_database() {
        assert!(matches!(quantity_to_db(u64::MAX), Err(StoreError::Backend(_))));
        assert_eq!(quantity_to_db(3).unwrap(), 3);
    }
}
