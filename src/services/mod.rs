pub mod financial_asset_service;
