pub(crate) mod financial_assets;
pub(crate) mod health;
