use sqlx::PgPool;

use crate::models::{FinancialAsset, NewFinancialAsset};

// Parameterized statements for the financial_assets table, one function per
// operation. Every call goes through the shared pool; callers own error
// classification and any read-after-write logic.

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<FinancialAsset>, sqlx::Error> {
    sqlx::query_as::<_, FinancialAsset>(
        "SELECT id, name, type, value, purchase_date, user_id, description, created_at, updated_at
         FROM financial_assets
         ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_by_id(pool: &PgPool, id: i64) -> Result<Option<FinancialAsset>, sqlx::Error> {
    sqlx::query_as::<_, FinancialAsset>(
        "SELECT id, name, type, value, purchase_date, user_id, description, created_at, updated_at
         FROM financial_assets
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_by_user_id(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<FinancialAsset>, sqlx::Error> {
    sqlx::query_as::<_, FinancialAsset>(
        "SELECT id, name, type, value, purchase_date, user_id, description, created_at, updated_at
         FROM financial_assets
         WHERE user_id = $1
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Inserts a new asset and returns the server-assigned id.
pub async fn insert(pool: &PgPool, asset: &NewFinancialAsset) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO financial_assets (name, type, value, purchase_date, user_id, description)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(&asset.name)
    .bind(&asset.asset_type)
    .bind(asset.value)
    .bind(asset.purchase_date)
    .bind(asset.user_id)
    .bind(&asset.description)
    .fetch_one(pool)
    .await
}

/// Persists a fully merged row. `user_id` and `created_at` are deliberately
/// absent from the SET list; they are immutable through this path.
pub async fn update(pool: &PgPool, asset: &FinancialAsset) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE financial_assets
         SET name = $1, type = $2, value = $3, purchase_date = $4, description = $5, updated_at = $6
         WHERE id = $7",
    )
    .bind(&asset.name)
    .bind(&asset.asset_type)
    .bind(asset.value)
    .bind(asset.purchase_date)
    .bind(&asset.description)
    .bind(asset.updated_at)
    .bind(asset.id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Deletes by id and reports how many rows actually went away.
pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM financial_assets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
