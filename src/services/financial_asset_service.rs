use sqlx::PgPool;

use crate::db::financial_asset_queries;
use crate::errors::AppError;
use crate::models::{validate_financial_asset, FinancialAsset, FinancialAssetPatch, NewFinancialAsset};

// Domain operations over financial assets: existence checks, merge-then-
// validate for partial updates, and a re-read after every write so callers
// only ever see the canonical row with its server-assigned fields.

pub async fn select_all(pool: &PgPool) -> Result<Vec<FinancialAsset>, AppError> {
    let assets = financial_asset_queries::fetch_all(pool).await?;
    Ok(assets)
}

/// Fetches one asset or fails with `NotFound`. Every operation that depends on
/// existence (insert re-read, update, delete) funnels through here so missing
/// rows fail uniformly.
pub async fn select_by_id(pool: &PgPool, id: i64) -> Result<FinancialAsset, AppError> {
    financial_asset_queries::fetch_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Financial asset {} not found", id)))
}

pub async fn select_by_user_id(pool: &PgPool, user_id: i64) -> Result<Vec<FinancialAsset>, AppError> {
    let assets = financial_asset_queries::fetch_by_user_id(pool, user_id).await?;
    Ok(assets)
}

/// Validates and inserts a new asset, then re-reads it by the assigned id so
/// the caller never sees stale or client-echoed values for id or timestamps.
pub async fn insert(pool: &PgPool, asset: NewFinancialAsset) -> Result<FinancialAsset, AppError> {
    validate_financial_asset(&asset.name, &asset.asset_type, asset.value)?;
    let id = financial_asset_queries::insert(pool, &asset).await?;
    select_by_id(pool, id).await
}

/// Applies a partial update. The patch is merged over the existing row before
/// validation, so a patch touching only `value` still re-validates the stored
/// `name` and `type`. The id never changes; `updated_at` is refreshed.
pub async fn update(
    pool: &PgPool,
    id: i64,
    patch: FinancialAssetPatch,
) -> Result<FinancialAsset, AppError> {
    let existing = select_by_id(pool, id).await?;
    let merged = existing.merge(patch);
    validate_financial_asset(&merged.name, &merged.asset_type, merged.value)?;
    financial_asset_queries::update(pool, &merged).await?;
    select_by_id(pool, id).await
}

/// Deletes an asset after an existence check. The returned flag comes from the
/// row count of the delete itself, so a row that vanished between the check
/// and the delete reports `false` rather than a phantom success.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    select_by_id(pool, id).await?;
    let removed = financial_asset_queries::delete(pool, id).await?;
    Ok(deletion_succeeded(removed))
}

// Maps the delete statement's row count onto the success flag. Zero rows after
// the existence check passed means the row vanished in between.
fn deletion_succeeded(rows_removed: u64) -> bool {
    rows_removed > 0
}
