//! Alert persistence operations.

use sqlx::SqlitePool;

use altwatch_core::Alert;

use crate::error::StoreError;

/// Insert an alert with its expiry and push it onto the capped active list,
/// trimming the list to `cap` in the same transaction. Expired keyed rows are
/// purged first.
pub async fn insert_alert(
    pool: &SqlitePool,
    alert: &Alert,
    now_ms: i64,
    expires_at_ms: i64,
    cap: usize,
) -> Result<(), StoreError> {
    let payload = serde_json::to_string(alert)?;
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM alerts WHERE expires_at_ms <= ?1")
        .bind(now_ms)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO alerts (key, payload, created_at_ms, expires_at_ms)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(key) DO UPDATE SET
            payload = ?2, created_at_ms = ?3, expires_at_ms = ?4
        "#,
    )
    .bind(alert.store_key())
    .bind(&payload)
    .bind(alert.timestamp.timestamp_millis())
    .bind(expires_at_ms)
    .execute(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO active_alerts (payload) VALUES (?1)")
        .bind(&payload)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "DELETE FROM active_alerts WHERE seq NOT IN (SELECT seq FROM active_alerts ORDER BY seq DESC LIMIT ?1)",
    )
    .bind(cap as i64)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Raw active-list payloads, newest first.
pub async fn load_active_payloads(pool: &SqlitePool) -> Result<Vec<String>, StoreError> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT payload FROM active_alerts ORDER BY seq DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(payload,)| payload).collect())
}

/// Raw (key, payload) pairs of unexpired alerts, most recent first, ties by key.
pub async fn load_history_payloads(
    pool: &SqlitePool,
    now_ms: i64,
    limit: usize,
) -> Result<Vec<(String, String)>, StoreError> {
    let rows = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT key, payload FROM alerts
        WHERE expires_at_ms > ?1
        ORDER BY created_at_ms DESC, key ASC
        LIMIT ?2
        "#,
    )
    .bind(now_ms)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
