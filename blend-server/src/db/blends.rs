//! Blend record queries

use blend_common::time::{from_millis, now_millis};
use blend_common::{BlendId, BlendPayload, BlendRecord, BlendRow, Result};
use sqlx::SqlitePool;

type BlendRowTuple = (String, String, String, Option<f64>, i64, i64);

const SELECT_COLUMNS: &str = "id, rows_json, flows_json, generation, created_at, updated_at";

fn decode(row: BlendRowTuple) -> Result<BlendRecord> {
    let (id, rows_json, flows_json, generation, created_at, updated_at) = row;
    let rows: Vec<BlendRow> = serde_json::from_str(&rows_json)?;
    let flows: Vec<f64> = serde_json::from_str(&flows_json)?;

    Ok(BlendRecord {
        id: BlendId::new(id),
        rows,
        flows,
        generation,
        created_at: from_millis(created_at),
        updated_at: from_millis(updated_at),
    })
}

/// Insert a new record with a fresh id and `created_at = now`
pub async fn insert_blend(pool: &SqlitePool, payload: &BlendPayload) -> Result<BlendRecord> {
    let id = BlendId::generate();
    let now = now_millis();
    let rows_json = serde_json::to_string(&payload.rows)?;
    let flows_json = serde_json::to_string(&payload.flows)?;

    sqlx::query(
        r#"
        INSERT INTO blends (id, rows_json, flows_json, generation, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.as_str())
    .bind(&rows_json)
    .bind(&flows_json)
    .bind(payload.generation)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(BlendRecord {
        id,
        rows: payload.rows.clone(),
        flows: payload.flows.clone(),
        generation: payload.generation,
        created_at: from_millis(now),
        updated_at: from_millis(now),
    })
}

/// Replace rows/flows/generation of an existing record in place
///
/// `created_at` is left untouched; only `updated_at` moves. Returns `None`
/// when no record has this id.
pub async fn replace_blend(
    pool: &SqlitePool,
    id: &BlendId,
    payload: &BlendPayload,
) -> Result<Option<BlendRecord>> {
    let rows_json = serde_json::to_string(&payload.rows)?;
    let flows_json = serde_json::to_string(&payload.flows)?;

    let sql = format!(
        r#"
        UPDATE blends
        SET rows_json = ?, flows_json = ?, generation = ?, updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        SELECT_COLUMNS
    );

    let row = sqlx::query_as::<_, BlendRowTuple>(&sql)
        .bind(&rows_json)
        .bind(&flows_json)
        .bind(payload.generation)
        .bind(now_millis())
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.map(decode).transpose()
}

/// Record with the greatest `created_at` (later insert wins ties)
pub async fn latest_blend(pool: &SqlitePool) -> Result<Option<BlendRecord>> {
    let sql = format!(
        "SELECT {} FROM blends ORDER BY created_at DESC, seq DESC LIMIT 1",
        SELECT_COLUMNS
    );

    let row = sqlx::query_as::<_, BlendRowTuple>(&sql)
        .fetch_optional(pool)
        .await?;

    row.map(decode).transpose()
}

/// Look up one record by id
pub async fn get_blend(pool: &SqlitePool, id: &BlendId) -> Result<Option<BlendRecord>> {
    let sql = format!("SELECT {} FROM blends WHERE id = ?", SELECT_COLUMNS);

    let row = sqlx::query_as::<_, BlendRowTuple>(&sql)
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.map(decode).transpose()
}

/// Number of stored records
pub async fn count_blends(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blends")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
