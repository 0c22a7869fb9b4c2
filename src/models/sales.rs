use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    #[validate]
    pub date_range: DateRange,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub total_sales: f64,
    #[serde(default)]
    pub total_transactions: u64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub average_sale: f64,
    #[serde(default)]
    pub total_items_sold: u64,
}

/// Takings for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAgg {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub transactions: u64,
    #[serde(default)]
    pub items_sold: u64,
}

/// Takings for one shop over the whole period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopAgg {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub transactions: u64,
    #[serde(default)]
    pub items_sold: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRevenueRow {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub revenue: Option<f64>,
}

/// Sales report payload.
///
/// `top_products` is ranked in input order, so callers sort it by revenue
/// first. The keyed breakdowns keep the producer's key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportData {
    #[validate]
    pub summary: SalesSummary,
    #[serde(default)]
    pub daily_sales: IndexMap<String, DailyAgg>,
    pub top_products: Vec<ProductRevenueRow>,
    #[serde(default)]
    pub sales_by_shop: IndexMap<String, ShopAgg>,
}
