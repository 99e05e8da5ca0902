mod financial_asset;
mod user;

pub use financial_asset::{
    validate_financial_asset, CreateFinancialAssetRequest, FinancialAsset, FinancialAssetPatch,
    NewFinancialAsset, UpdateFinancialAssetRequest,
};
#[allow(unused_imports)]
pub use user::{validate_user, User};
