use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{flexible_datetime, DateRange};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    #[validate]
    pub date_range: DateRange,
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_quantity: u64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub inventory_value: f64,
    #[serde(default)]
    pub low_stock_count: u64,
    #[serde(default)]
    pub out_of_stock_count: u64,
    #[serde(default)]
    pub total_locations: u64,
}

/// Stock held by one shop for one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopStockRow {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub min_stock_level: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// A product at or below its minimum stock level somewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRow {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    /// "shop" or "store"
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub current_quantity: Option<i64>,
    #[serde(default)]
    pub min_stock_level: Option<i64>,
}

/// Stock held by a back-office store (warehouse) for one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStockRow {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "flexible_datetime::deserialize_option")]
    pub last_updated: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReportData {
    #[validate]
    pub summary: InventorySummary,
    pub shop_inventory: Vec<ShopStockRow>,
    pub low_stock_alerts: Vec<AlertRow>,
    #[serde(default)]
    pub store_inventory: Vec<StoreStockRow>,
}
