use crate::core::{StoragePort, StoredData};
use crate::utils::error::Result;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

const SCHEMA: &str = include_str!("../../migrations/0001_create_stored_data.sql");

/// 開啟連線池並確保資料表存在
pub async fn connect_pool(url: &str, max_connections: u32) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    ensure_schema(&pool).await?;
    tracing::debug!("SQLite pool ready ({} max connections)", max_connections);
    Ok(pool)
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}

/// `StoragePort` backed by the `stored_data` table.
///
/// Cheap to construct: it only holds a clone of the pool handle, so every
/// request builds its own instance.
#[derive(Debug, Clone)]
pub struct SqlStorage {
    pool: SqlitePool,
}

impl SqlStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> Result<StoredData> {
        let tag: String = row.try_get("tag")?;
        let value: String = row.try_get("value")?;
        let date: String = row.try_get("date")?;
        Ok(StoredData::from_row(tag, value, &date)?)
    }
}

impl StoragePort for SqlStorage {
    async fn get(&self, tag: &str) -> Result<Option<StoredData>> {
        tracing::debug!("get tag={}", tag);
        let row = sqlx::query("SELECT tag, value, date FROM stored_data WHERE tag = ?")
            .bind(tag)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn set(&self, tag: &str, value: &str) -> Result<StoredData> {
        let data = StoredData::new(tag, value);
        tracing::debug!("set tag={} date={}", tag, data.date_string());

        // 單一 INSERT OR REPLACE：新增與覆寫在同一個原子語句內完成
        sqlx::query("INSERT OR REPLACE INTO stored_data (tag, value, date) VALUES (?, ?, ?)")
            .bind(&data.tag)
            .bind(&data.value)
            .bind(data.date_string())
            .execute(&self.pool)
            .await?;

        Ok(data)
    }

    async fn delete(&self, tag: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM stored_data WHERE tag = ?")
            .bind(tag)
            .execute(&self.pool)
            .await?;

        tracing::debug!("delete tag={} affected={}", tag, result.rows_affected());
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<StoredData>> {
        let rows = sqlx::query("SELECT tag, value, date FROM stored_data ORDER BY tag ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EdgeError;

    async fn memory_storage() -> SqlStorage {
        // 記憶體資料庫只存在於單一連線上
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ensure_schema(&pool).await.unwrap();
        SqlStorage::new(pool)
    }

    #[tokio::test]
    async fn test_get_missing_tag_is_none() {
        let storage = memory_storage().await;
        assert_eq!(storage.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_returns_same_record() {
        let storage = memory_storage().await;
        let written = storage.set("color", "blue").await.unwrap();
        let read = storage.get("color").await.unwrap().unwrap();
        assert_eq!(read, written);
    }

    #[tokio::test]
    async fn test_set_replaces_existing_row() {
        let storage = memory_storage().await;
        storage.set("k", "v1").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = storage.set("k", "v2").await.unwrap();

        let all = storage.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], second);
        assert_eq!(all[0].value, "v2");
    }

    #[tokio::test]
    async fn test_delete_reports_whether_row_existed() {
        let storage = memory_storage().await;
        assert!(!storage.delete("ghost").await.unwrap());

        storage.set("real", "1").await.unwrap();
        assert!(storage.delete("real").await.unwrap());
        assert_eq!(storage.get("real").await.unwrap(), None);
        assert!(!storage.delete("real").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_orders_by_tag() {
        let storage = memory_storage().await;
        assert!(storage.list().await.unwrap().is_empty());

        for tag in ["b", "a", "c"] {
            storage.set(tag, tag).await.unwrap();
        }
        let tags: Vec<String> = storage
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.tag)
            .collect();
        assert_eq!(tags, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_corrupt_date_surfaces_as_error() {
        let storage = memory_storage().await;
        sqlx::query("INSERT INTO stored_data (tag, value, date) VALUES ('bad', 'x', 'not-a-date')")
            .execute(&storage.pool)
            .await
            .unwrap();

        let err = storage.get("bad").await.unwrap_err();
        assert!(matches!(err, EdgeError::InvalidTimestamp(_)));
    }

    #[tokio::test]
    async fn test_missing_table_propagates_database_error() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let storage = SqlStorage::new(pool);

        let err = storage.list().await.unwrap_err();
        assert!(matches!(err, EdgeError::Database(_)));
    }
}
