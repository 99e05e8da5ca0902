use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{
    CreateFinancialAssetRequest, FinancialAsset, FinancialAssetPatch, NewFinancialAsset,
    UpdateFinancialAssetRequest,
};
use crate::services::financial_asset_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_financial_assets).post(create_financial_asset))
        .route(
            "/:id",
            get(get_financial_asset)
                .put(update_financial_asset)
                .delete(delete_financial_asset),
        )
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(rename = "userOnly")]
    user_only: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
}

/// GET / - all assets, or only the caller's with `?userOnly=true`.
async fn list_financial_assets(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<FinancialAsset>>, AppError> {
    if user_only_requested(params.user_only.as_deref()) {
        let CurrentUser(user_id) = user.ok_or(AppError::Unauthorized)?;
        info!("GET /api/financial-assets?userOnly=true - listing assets for user {}", user_id);
        let assets = financial_asset_service::select_by_user_id(&state.pool, user_id).await?;
        Ok(Json(assets))
    } else {
        info!("GET /api/financial-assets - listing all assets");
        let assets = financial_asset_service::select_all(&state.pool).await?;
        Ok(Json(assets))
    }
}

/// GET /:id - fetch a single asset.
async fn get_financial_asset(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<FinancialAsset>, AppError> {
    let id = parse_id(&raw_id)?;
    info!("GET /api/financial-assets/{} - fetching asset", id);
    let asset = financial_asset_service::select_by_id(&state.pool, id).await?;
    Ok(Json(asset))
}

/// POST / - create an asset owned by the caller. `user_id` always comes from
/// the token, never from the body; date and description get their defaults.
async fn create_financial_asset(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(dto): Json<CreateFinancialAssetRequest>,
) -> Result<Json<FinancialAsset>, AppError> {
    info!("POST /api/financial-assets - creating asset for user {}", user_id);

    let purchase_date = match dto.purchase_date.as_deref() {
        Some(raw) => parse_purchase_date(raw)?,
        None => Utc::now(),
    };

    let asset = NewFinancialAsset {
        name: dto.name,
        asset_type: dto.asset_type,
        value: dto.value,
        purchase_date,
        user_id,
        description: dto.description.unwrap_or_default(),
    };

    let created = financial_asset_service::insert(&state.pool, asset).await?;
    Ok(Json(created))
}

/// PUT /:id - partial update, owner only. An omitted purchase_date stays
/// unset so the merge keeps the stored value.
async fn update_financial_asset(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(raw_id): Path<String>,
    Json(dto): Json<UpdateFinancialAssetRequest>,
) -> Result<Json<FinancialAsset>, AppError> {
    let id = parse_id(&raw_id)?;
    info!("PUT /api/financial-assets/{} - update by user {}", id, user_id);

    let existing = financial_asset_service::select_by_id(&state.pool, id).await?;
    ensure_owner(&existing, user_id, "update")?;

    let patch = FinancialAssetPatch {
        name: dto.name,
        asset_type: dto.asset_type,
        value: dto.value,
        purchase_date: dto
            .purchase_date
            .as_deref()
            .map(parse_purchase_date)
            .transpose()?,
        description: dto.description,
    };

    let updated = financial_asset_service::update(&state.pool, id, patch).await?;
    Ok(Json(updated))
}

/// DELETE /:id - owner only. The success flag reflects whether a row was
/// actually removed.
async fn delete_financial_asset(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id(&raw_id)?;
    info!("DELETE /api/financial-assets/{} - delete by user {}", id, user_id);

    let existing = financial_asset_service::select_by_id(&state.pool, id).await?;
    ensure_owner(&existing, user_id, "delete")?;

    let success = financial_asset_service::delete(&state.pool, id).await?;
    Ok(Json(DeleteResponse { success }))
}

// The original client sends the literal string "true"; anything else (or no
// flag at all) means an unscoped listing.
fn user_only_requested(flag: Option<&str>) -> bool {
    matches!(flag, Some("true"))
}

/// Fails with `Forbidden` unless the asset belongs to the given user.
fn ensure_owner(existing: &FinancialAsset, user_id: i64, action: &str) -> Result<(), AppError> {
    if existing.user_id != user_id {
        warn!(
            "User {} attempted to {} asset {} owned by user {}",
            user_id, action, existing.id, existing.user_id
        );
        return Err(AppError::Forbidden(format!(
            "Not authorized to {} this asset",
            action
        )));
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::Validation("Invalid ID in URL".to_string()))
}

/// Accepts RFC 3339 timestamps or plain dates (taken as midnight UTC).
fn parse_purchase_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = raw.parse::<NaiveDate>() {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(AppError::Validation(format!("Invalid purchase_date: {}", raw)))
}
