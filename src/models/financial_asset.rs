use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

/// Valid financial asset types.
pub const ASSET_TYPES: [&str; 7] = [
    "stock",
    "bond",
    "fund",
    "crypto",
    "real_estate",
    "cash",
    "other",
];

// Represents a financial holding (stock, bond, real estate, ...) owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FinancialAsset {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub asset_type: String,
    pub value: f64,
    pub purchase_date: DateTime<Utc>,
    pub user_id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A financial asset ready to be inserted: server-assigned fields (id,
/// created_at, updated_at) are still unknown. `user_id`, the purchase date
/// default and the description default have already been attached by the
/// controller.
#[derive(Debug, Clone)]
pub struct NewFinancialAsset {
    pub name: String,
    pub asset_type: String,
    pub value: f64,
    pub purchase_date: DateTime<Utc>,
    pub user_id: i64,
    pub description: String,
}

/// A partial change set for an existing asset. `None` means "leave the stored
/// value alone". There is intentionally no `id` or `user_id` here; neither is
/// ever writable through the public API.
#[derive(Debug, Default, Clone)]
pub struct FinancialAssetPatch {
    pub name: Option<String>,
    pub asset_type: Option<String>,
    pub value: Option<f64>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl FinancialAsset {
    /// Shallow-merges a patch over this row. `id`, `user_id` and `created_at`
    /// always come from the stored row; `updated_at` is refreshed.
    pub fn merge(self, patch: FinancialAssetPatch) -> FinancialAsset {
        FinancialAsset {
            id: self.id,
            name: patch.name.unwrap_or(self.name),
            asset_type: patch.asset_type.unwrap_or(self.asset_type),
            value: patch.value.unwrap_or(self.value),
            purchase_date: patch.purchase_date.unwrap_or(self.purchase_date),
            user_id: self.user_id,
            description: patch.description.unwrap_or(self.description),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

/// Validates the business rules for a financial asset. Runs against the final
/// candidate (for updates: the merged row, so untouched fields are re-checked
/// too). Pure, no I/O.
pub fn validate_financial_asset(name: &str, asset_type: &str, value: f64) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Asset name is required".to_string()));
    }

    if asset_type.is_empty() {
        return Err(AppError::Validation("Asset type is required".to_string()));
    }

    if !ASSET_TYPES.contains(&asset_type) {
        return Err(AppError::Validation(format!(
            "Invalid asset type. Must be one of: {}",
            ASSET_TYPES.join(", ")
        )));
    }

    if value < 0.0 {
        return Err(AppError::Validation(
            "Asset value must be a non-negative number".to_string(),
        ));
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateFinancialAssetRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub value: f64,
    pub purchase_date: Option<String>,
    pub description: Option<String>,
}

// All fields optional; unknown keys (including a client-sent `id` or
// `user_id`) are dropped during deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFinancialAssetRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub value: Option<f64>,
    pub purchase_date: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_asset() -> FinancialAsset {
        let now = Utc::now();
        FinancialAsset {
            id: 42,
            name: "AAPL".to_string(),
            asset_type: "stock".to_string(),
            value: 100.0,
            purchase_date: now,
            user_id: 7,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn valid_asset_passes_validation() {
        assert!(validate_financial_asset("AAPL", "stock", 100.0).is_ok());
        assert!(validate_financial_asset("House", "real_estate", 0.0).is_ok());
    }

    #[test]
    fn every_listed_asset_type_is_accepted() {
        for asset_type in ASSET_TYPES {
            assert!(validate_financial_asset("x", asset_type, 1.0).is_ok());
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = validate_financial_asset("", "stock", 1.0).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Asset name is required"));
    }

    #[test]
    fn missing_type_is_rejected() {
        let err = validate_financial_asset("AAPL", "", 1.0).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Asset type is required"));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = validate_financial_asset("AAPL", "derivative", 1.0).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("Invalid asset type")));
    }

    #[test]
    fn negative_value_is_rejected() {
        let err = validate_financial_asset("AAPL", "stock", -1.0).unwrap_err();
        assert!(
            matches!(err, AppError::Validation(msg) if msg == "Asset value must be a non-negative number")
        );
    }

    #[test]
    fn merge_applies_only_supplied_fields() {
        let existing = sample_asset();
        let patch = FinancialAssetPatch {
            value: Some(250.5),
            ..Default::default()
        };
        let merged = existing.clone().merge(patch);

        assert_eq!(merged.value, 250.5);
        assert_eq!(merged.name, existing.name);
        assert_eq!(merged.asset_type, existing.asset_type);
        assert_eq!(merged.purchase_date, existing.purchase_date);
        assert_eq!(merged.description, existing.description);
    }

    #[test]
    fn merge_never_changes_id_owner_or_created_at() {
        let existing = sample_asset();
        let patch = FinancialAssetPatch {
            name: Some("MSFT".to_string()),
            asset_type: Some("stock".to_string()),
            value: Some(1.0),
            purchase_date: Some(Utc::now()),
            description: Some("rebalanced".to_string()),
        };
        let merged = existing.clone().merge(patch);

        assert_eq!(merged.id, existing.id);
        assert_eq!(merged.user_id, existing.user_id);
        assert_eq!(merged.created_at, existing.created_at);
        assert!(merged.updated_at >= existing.updated_at);
    }

    #[test]
    fn merged_row_with_negative_value_fails_validation() {
        // A patch touching only `value` must still be caught even though the
        // stored name and type are valid.
        let merged = sample_asset().merge(FinancialAssetPatch {
            value: Some(-1.0),
            ..Default::default()
        });
        assert!(validate_financial_asset(&merged.name, &merged.asset_type, merged.value).is_err());
    }

    #[test]
    fn update_request_ignores_client_supplied_id_and_user_id() {
        let dto: UpdateFinancialAssetRequest =
            serde_json::from_str(r#"{"id": 999, "user_id": 999, "value": 5.0}"#)
                .expect("unknown keys should be dropped");
        assert_eq!(dto.value, Some(5.0));
        assert!(dto.name.is_none());
    }

    #[test]
    fn asset_serializes_type_under_its_wire_name() {
        let asset = sample_asset();
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["type"], "stock");
        assert!(json.get("asset_type").is_none());
    }
}
