#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use inventory_reports::{
    reports::FixedClock, PaginatedDocumentRenderer, ReportConfig, ReportRequest, ReportService,
};

pub fn period() -> Value {
    json!({ "startDate": "2024-01-01T00:00:00Z", "endDate": "2024-01-31T23:59:59Z" })
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()))
}

pub fn pdf_renderer() -> PaginatedDocumentRenderer {
    PaginatedDocumentRenderer::default().with_clock(fixed_clock())
}

pub fn service() -> ReportService {
    ReportService::new(&ReportConfig::default()).with_clock(fixed_clock())
}

pub fn inventory_json() -> Value {
    json!({
        "reportType": "inventory",
        "summary": {
            "dateRange": period(),
            "totalProducts": 3,
            "totalQuantity": 140,
            "inventoryValue": 2450.75,
            "lowStockCount": 1,
            "outOfStockCount": 1,
            "totalLocations": 2
        },
        "shopInventory": [
            { "productName": "Desk Lamp", "sku": "LMP-01", "shopName": "High Street",
              "quantity": 40, "minStockLevel": 10, "price": 24.5 },
            { "productName": "Kettle", "sku": "KTL-02", "shopName": "High Street",
              "quantity": 100, "minStockLevel": 20, "price": 14.7075 },
            { "sku": "MYS-03" }
        ],
        "lowStockAlerts": [
            { "productName": "Toaster", "sku": "TST-04", "locationName": "Depot",
              "locationType": "store", "currentQuantity": 2, "minStockLevel": 5 }
        ],
        "storeInventory": [
            { "productName": "Toaster", "sku": "TST-04", "storeName": "Depot",
              "quantity": 2, "lastUpdated": "2024-01-20T09:00:00+02:00" }
        ]
    })
}

pub fn sales_json() -> Value {
    json!({
        "reportType": "sales",
        "summary": {
            "dateRange": period(),
            "totalSales": 1500.0,
            "totalTransactions": 30,
            "averageSale": 50.0,
            "totalItemsSold": 75
        },
        "dailySales": {
            "2024-01-03": { "total": 1000.0, "transactions": 20, "itemsSold": 50 },
            "2024-01-01": { "total": 500.0, "transactions": 10, "itemsSold": 25 },
            "2024-01-02": { "total": 0.0, "transactions": 0, "itemsSold": 0 }
        },
        "topProducts": [
            { "productName": "Kettle", "sku": "KTL-02", "quantity": 30, "revenue": 900.0 },
            { "productName": "Desk Lamp", "sku": "LMP-01", "quantity": 0, "revenue": 0.0 }
        ],
        "salesByShop": {
            "High Street": { "total": 1500.0, "transactions": 30, "itemsSold": 75 }
        }
    })
}

pub fn transfer_rows(count: usize) -> Vec<Value> {
    let statuses = ["completed", "PENDING", "rejected", "in transit"];
    (0..count)
        .map(|n| {
            json!({
                "date": "2024-01-10",
                "productName": format!("Item {:03}", n),
                "sku": format!("SKU-{:03}", n),
                "fromLocation": "Warehouse",
                "toLocation": "High Street",
                "quantity": n as i64 + 1,
                "status": statuses[n % statuses.len()]
            })
        })
        .collect()
}

pub fn transfers_json(count: usize) -> Value {
    json!({
        "reportType": "transfers",
        "summary": {
            "dateRange": period(),
            "totalTransfers": count,
            "completedTransfers": count,
            "totalItemsTransferred": count
        },
        "transfers": transfer_rows(count),
        "frequentTransfers": [
            { "productName": "Item 000", "fromLocation": "Warehouse",
              "toLocation": "High Street", "transferCount": 4, "totalQuantity": 12 }
        ]
    })
}

pub fn activity_rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|n| {
            json!({
                "timestamp": format!("2024-01-{:02}T{:02}:30:00+01:00", 1 + n % 28, n % 24),
                "productName": format!("Item {:03}", n),
                "activityType": if n % 2 == 0 { "sale" } else { "restock" },
                "quantity": 1,
                "locationName": "High Street",
                "performedBy": "clerk"
            })
        })
        .collect()
}

pub fn movement_json(count: usize) -> Value {
    json!({
        "reportType": "productMovement",
        "summary": {
            "dateRange": period(),
            "totalActivities": count,
            "totalIncoming": 10,
            "totalOutgoing": 4,
            "productsTracked": 2
        },
        "recentActivities": activity_rows(count),
        "productMovement": {
            "Kettle": { "incoming": 10, "outgoing": 3 },
            "Desk Lamp": { "outgoing": 1 }
        }
    })
}

pub fn request(value: Value) -> ReportRequest {
    ReportRequest::from_json(value).expect("fixture should parse")
}

pub fn all_requests() -> Vec<ReportRequest> {
    vec![
        request(inventory_json()),
        request(sales_json()),
        request(transfers_json(5)),
        request(movement_json(5)),
    ]
}

pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
