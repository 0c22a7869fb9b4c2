use super::format::{
    format_date, format_optional_date, format_optional_timestamp, or_not_available, or_unknown,
    safe_ratio,
};
use super::layout::{CellValue, Column, ReportManifest, Section, SummaryItem};
use crate::config::ReportLimits;
use crate::models::{
    InventoryReportData, MovementReportData, ReportRequest, SalesReportData, TransferReportData,
};

/// Maps every report variant onto one [`ReportManifest`].
///
/// This is the only place that knows which sections a report has, in which
/// order, and how derived columns (averages, net movement) are computed.
/// Renderers only walk the manifest.
#[derive(Debug, Clone, Default)]
pub struct SectionedDocumentBuilder {
    limits: ReportLimits,
}

impl SectionedDocumentBuilder {
    pub fn new(limits: ReportLimits) -> Self {
        Self { limits }
    }

    pub fn build(&self, request: &ReportRequest) -> ReportManifest {
        let kind = request.kind();
        let range = request.date_range();
        let period = format!(
            "{} to {}",
            format_date(&range.start_date),
            format_date(&range.end_date)
        );

        let (summary, sections, column_widths) = match request {
            ReportRequest::Inventory(data) => self.inventory(data),
            ReportRequest::Sales(data) => self.sales(data),
            ReportRequest::Transfers(data) => self.transfers(data),
            ReportRequest::ProductMovement(data) => self.movement(data),
        };

        ReportManifest {
            kind,
            title: kind.title().to_string(),
            period,
            summary,
            // empty collections never produce a section
            sections: sections.into_iter().filter(|s| !s.is_empty()).collect(),
            column_widths,
        }
    }

    fn inventory(&self, data: &InventoryReportData) -> (Vec<SummaryItem>, Vec<Section>, Vec<f64>) {
        let summary = &data.summary;
        let items = vec![
            SummaryItem::new("Total Products", count(summary.total_products)),
            SummaryItem::new("Total Quantity", count(summary.total_quantity)),
            SummaryItem::new("Inventory Value", CellValue::Currency(summary.inventory_value)),
            SummaryItem::new("Low Stock Items", count(summary.low_stock_count)),
            SummaryItem::new("Out of Stock Items", count(summary.out_of_stock_count)),
            SummaryItem::new("Locations", count(summary.total_locations)),
        ];

        let mut shops = Section::new(
            "Shop Inventory",
            vec![
                Column::new("Product", 150.0),
                Column::new("SKU", 70.0),
                Column::new("Shop", 110.0),
                Column::new("Quantity", 55.0),
                Column::new("Min Stock", 55.0),
                Column::new("Price", 70.0),
            ],
        );
        for row in &data.shop_inventory {
            shops.push_row(vec![
                CellValue::Text(or_unknown(row.product_name.as_deref())),
                CellValue::Text(or_not_available(row.sku.as_deref())),
                CellValue::Text(or_unknown(row.shop_name.as_deref())),
                CellValue::Integer(row.quantity.unwrap_or(0)),
                CellValue::Integer(row.min_stock_level.unwrap_or(0)),
                CellValue::Currency(row.price.unwrap_or(0.0)),
            ]);
        }

        let mut alerts = Section::new(
            "Low Stock Alerts",
            vec![
                Column::new("Product", 150.0),
                Column::new("SKU", 70.0),
                Column::new("Location", 110.0),
                Column::new("Type", 55.0),
                Column::new("Current", 55.0),
                Column::new("Minimum", 70.0),
            ],
        );
        for row in &data.low_stock_alerts {
            alerts.push_row(vec![
                CellValue::Text(or_unknown(row.product_name.as_deref())),
                CellValue::Text(or_not_available(row.sku.as_deref())),
                CellValue::Text(or_unknown(row.location_name.as_deref())),
                CellValue::Text(or_not_available(row.location_type.as_deref())),
                CellValue::Integer(row.current_quantity.unwrap_or(0)),
                CellValue::Integer(row.min_stock_level.unwrap_or(0)),
            ]);
        }

        let mut stores = Section::new(
            "Store Inventory",
            vec![
                Column::new("Product", 150.0),
                Column::new("SKU", 70.0),
                Column::new("Store", 110.0),
                Column::new("Quantity", 55.0),
                Column::new("Last Updated", 125.0),
            ],
        );
        for row in &data.store_inventory {
            stores.push_row(vec![
                CellValue::Text(or_unknown(row.product_name.as_deref())),
                CellValue::Text(or_not_available(row.sku.as_deref())),
                CellValue::Text(or_unknown(row.store_name.as_deref())),
                CellValue::Integer(row.quantity.unwrap_or(0)),
                CellValue::Text(format_optional_date(row.last_updated.as_ref())),
            ]);
        }

        (
            items,
            vec![shops, alerts, stores],
            vec![30.0, 15.0, 25.0, 12.0, 12.0, 14.0],
        )
    }

    fn sales(&self, data: &SalesReportData) -> (Vec<SummaryItem>, Vec<Section>, Vec<f64>) {
        let summary = &data.summary;
        let items = vec![
            SummaryItem::new("Total Sales", CellValue::Currency(summary.total_sales)),
            SummaryItem::new("Total Transactions", count(summary.total_transactions)),
            SummaryItem::new("Average Sale", CellValue::Currency(summary.average_sale)),
            SummaryItem::new("Items Sold", count(summary.total_items_sold)),
        ];

        let mut daily = Section::new(
            "Daily Sales Breakdown",
            vec![
                Column::new("Date", 110.0),
                Column::new("Total Sales", 110.0),
                Column::new("Transactions", 90.0),
                Column::new("Items Sold", 90.0),
                Column::new("Average Sale", 110.0),
            ],
        );
        for (date, day) in &data.daily_sales {
            daily.push_row(vec![
                CellValue::Text(or_not_available(Some(date))),
                CellValue::Currency(day.total),
                count(day.transactions),
                count(day.items_sold),
                CellValue::Currency(safe_ratio(day.total, day.transactions as f64)),
            ]);
        }

        let mut top = Section::new(
            "Top Products",
            vec![
                Column::new("Rank", 40.0),
                Column::new("Product", 160.0),
                Column::new("SKU", 70.0),
                Column::new("Quantity Sold", 75.0),
                Column::new("Revenue", 85.0),
                Column::new("Avg Price", 82.0),
            ],
        );
        for (idx, row) in data.top_products.iter().enumerate() {
            let quantity = row.quantity.unwrap_or(0);
            let revenue = row.revenue.unwrap_or(0.0);
            top.push_row(vec![
                CellValue::Integer(idx as i64 + 1),
                CellValue::Text(or_unknown(row.product_name.as_deref())),
                CellValue::Text(or_not_available(row.sku.as_deref())),
                CellValue::Integer(quantity),
                CellValue::Currency(revenue),
                CellValue::Currency(safe_ratio(revenue, quantity as f64)),
            ]);
        }

        let mut shops = Section::new(
            "Sales by Shop",
            vec![
                Column::new("Shop", 150.0),
                Column::new("Total Sales", 100.0),
                Column::new("Transactions", 80.0),
                Column::new("Items Sold", 80.0),
                Column::new("Average Sale", 100.0),
            ],
        );
        for (shop, agg) in &data.sales_by_shop {
            shops.push_row(vec![
                CellValue::Text(or_unknown(Some(shop))),
                CellValue::Currency(agg.total),
                count(agg.transactions),
                count(agg.items_sold),
                CellValue::Currency(safe_ratio(agg.total, agg.transactions as f64)),
            ]);
        }

        (
            items,
            vec![daily, top, shops],
            vec![18.0, 30.0, 15.0, 15.0, 15.0, 14.0],
        )
    }

    fn transfers(&self, data: &TransferReportData) -> (Vec<SummaryItem>, Vec<Section>, Vec<f64>) {
        let summary = &data.summary;
        let items = vec![
            SummaryItem::new("Total Transfers", count(summary.total_transfers)),
            SummaryItem::new("Completed", count(summary.completed_transfers)),
            SummaryItem::new("Pending", count(summary.pending_transfers)),
            SummaryItem::new("Rejected", count(summary.rejected_transfers)),
            SummaryItem::new("Items Transferred", count(summary.total_items_transferred)),
        ];

        let mut details = Section::new(
            "Transfer Details",
            vec![
                Column::new("Date", 70.0),
                Column::new("Product", 130.0),
                Column::new("From", 100.0),
                Column::new("To", 100.0),
                Column::new("Quantity", 52.0),
                Column::new("Status", 60.0),
            ],
        )
        .with_row_cap(self.limits.transfer_rows);
        for row in &data.transfers {
            details.push_row(vec![
                CellValue::Text(format_optional_date(row.date.as_ref())),
                CellValue::Text(or_unknown(row.product_name.as_deref())),
                CellValue::Text(or_unknown(row.from_location.as_deref())),
                CellValue::Text(or_unknown(row.to_location.as_deref())),
                CellValue::Integer(row.quantity.unwrap_or(0)),
                CellValue::Status(row.status.clone()),
            ]);
        }

        let mut frequent = Section::new(
            "Frequent Transfers",
            vec![
                Column::new("Product", 150.0),
                Column::new("From", 110.0),
                Column::new("To", 110.0),
                Column::new("Transfers", 65.0),
                Column::new("Total Quantity", 77.0),
            ],
        );
        for row in &data.frequent_transfers {
            frequent.push_row(vec![
                CellValue::Text(or_unknown(row.product_name.as_deref())),
                CellValue::Text(or_unknown(row.from_location.as_deref())),
                CellValue::Text(or_unknown(row.to_location.as_deref())),
                count(row.transfer_count),
                CellValue::Integer(row.total_quantity),
            ]);
        }

        (
            items,
            vec![details, frequent],
            vec![14.0, 28.0, 22.0, 22.0, 12.0, 14.0],
        )
    }

    fn movement(&self, data: &MovementReportData) -> (Vec<SummaryItem>, Vec<Section>, Vec<f64>) {
        let summary = &data.summary;
        let items = vec![
            SummaryItem::new("Total Activities", count(summary.total_activities)),
            SummaryItem::new("Incoming", CellValue::Integer(summary.total_incoming)),
            SummaryItem::new("Outgoing", CellValue::Integer(summary.total_outgoing)),
            SummaryItem::new("Net Movement", CellValue::Integer(summary.net_movement())),
            SummaryItem::new("Products Tracked", count(summary.products_tracked)),
        ];

        let mut activities = Section::new(
            "Recent Activities",
            vec![
                Column::new("Date/Time", 85.0),
                Column::new("Product", 130.0),
                Column::new("Activity", 70.0),
                Column::new("Quantity", 52.0),
                Column::new("Location", 100.0),
                Column::new("User", 75.0),
            ],
        )
        .with_row_cap(self.limits.activity_rows);
        for row in &data.recent_activities {
            activities.push_row(vec![
                CellValue::Text(format_optional_timestamp(row.timestamp.as_ref())),
                CellValue::Text(or_unknown(row.product_name.as_deref())),
                CellValue::Text(or_not_available(row.activity_type.as_deref())),
                CellValue::Integer(row.quantity.unwrap_or(0)),
                CellValue::Text(or_unknown(row.location_name.as_deref())),
                CellValue::Text(or_not_available(row.performed_by.as_deref())),
            ]);
        }

        let mut by_product = Section::new(
            "Movement by Product",
            vec![
                Column::new("Product", 200.0),
                Column::new("Incoming", 100.0),
                Column::new("Outgoing", 100.0),
                Column::new("Net Movement", 112.0),
            ],
        );
        for (product, agg) in &data.product_movement {
            by_product.push_row(vec![
                CellValue::Text(or_unknown(Some(product))),
                CellValue::Integer(agg.incoming),
                CellValue::Integer(agg.outgoing),
                CellValue::Integer(agg.net()),
            ]);
        }

        (
            items,
            vec![activities, by_product],
            vec![18.0, 28.0, 14.0, 12.0, 22.0, 18.0],
        )
    }
}

fn count(value: u64) -> CellValue {
    CellValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}
