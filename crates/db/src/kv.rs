use sqlx::SqlitePool;

/// Get a stored value by key.
pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v))
}

/// Set a value (upsert).
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now().timestamp_millis();
    sqlx::query(
        "INSERT INTO kv_store (key, value, updated_ts) VALUES (?, ?, ?) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_ts = excluded.updated_ts",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete a key. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, key: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// List every stored key.
pub async fn list_keys(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT key FROM kv_store ORDER BY key")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(k,)| k).collect())
}

/// Number of stored rows.
pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv_store")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Total bytes held by keys and values.
pub async fn usage_bytes(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) =
        sqlx::query_as("SELECT COALESCE(SUM(LENGTH(key) + LENGTH(value)), 0) FROM kv_store")
            .fetch_one(pool)
            .await?;
    Ok(row.0)
}

/// Bytes held by one row, if present.
pub async fn entry_bytes(pool: &SqlitePool, key: &str) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT LENGTH(key) + LENGTH(value) FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(n,)| n))
}
