use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::model::leave_type::LeaveType;

/// Leave types are immutable reference data edited only by admins, so a
/// long-TTL in-memory cache is safe. Admin edits call `invalidate`.
pub static LEAVE_TYPE_CACHE: Lazy<Cache<u64, LeaveType>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Cache-first lookup, falling back to the database on miss.
pub async fn get(pool: &MySqlPool, leave_type_id: u64) -> Result<Option<LeaveType>, sqlx::Error> {
    if let Some(leave_type) = LEAVE_TYPE_CACHE.get(&leave_type_id).await {
        return Ok(Some(leave_type));
    }

    let leave_type = sqlx::query_as::<_, LeaveType>(
        "SELECT id, name, default_allocated_days FROM leave_types WHERE id = ?",
    )
    .bind(leave_type_id)
    .fetch_optional(pool)
    .await?;

    if let Some(leave_type) = &leave_type {
        LEAVE_TYPE_CACHE
            .insert(leave_type.id, leave_type.clone())
            .await;
    }

    Ok(leave_type)
}

/// Drop a cached entry after an admin edit.
pub async fn invalidate(leave_type_id: u64) {
    LEAVE_TYPE_CACHE.invalidate(&leave_type_id).await;
}

/// Load all leave types into the cache at startup.
pub async fn warmup(pool: &MySqlPool) -> Result<()> {
    let mut stream = sqlx::query_as::<_, LeaveType>(
        "SELECT id, name, default_allocated_days FROM leave_types",
    )
    .fetch(pool);

    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let leave_type = row?;
        LEAVE_TYPE_CACHE
            .insert(leave_type.id, leave_type)
            .await;
        total_count += 1;
    }

    tracing::info!("Leave type cache warmup complete: {} types", total_count);

    Ok(())
}
