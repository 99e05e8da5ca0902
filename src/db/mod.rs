pub mod financial_asset_queries;
