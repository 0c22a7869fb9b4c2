//! Property-based tests for layout invariants.
//!
//! Pagination arithmetic, input ordering and derived values are checked across
//! generated inputs rather than hand-picked fixtures.

mod common;

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use inventory_reports::config::PdfLayout;
use inventory_reports::reports::{PageFlow, TabularWorkbookRenderer};

use common::{period, request};

fn product_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,12}( [A-Z][a-z]{1,8})?"
}

fn day_strategy() -> impl Strategy<Value = (f64, u64)> {
    (0.0f64..1_000_000.0, 0u64..5_000)
}

fn sales_with_days(days: &[(f64, u64)]) -> Value {
    let mut daily = Map::new();
    for (n, (total, transactions)) in days.iter().enumerate() {
        daily.insert(
            format!("2024-01-{:02}", n + 1),
            json!({ "total": total, "transactions": transactions, "itemsSold": transactions }),
        );
    }
    json!({
        "reportType": "sales",
        "summary": { "dateRange": period() },
        "dailySales": daily,
        "topProducts": []
    })
}

// Property: rows laid out from the top margin fill whole pages of 50 rows
proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn page_count_matches_row_capacity(rows in 0usize..600) {
        let layout = PdfLayout::default();
        let mut flow = PageFlow::new(&layout);
        for _ in 0..rows {
            flow.reserve(layout.row_height);
            flow.advance(layout.row_height);
        }

        let needed = (rows as f32 * layout.row_height / layout.usable_height()).ceil() as usize;
        prop_assert_eq!(flow.page_count(), needed.max(1));
    }

    #[test]
    fn rows_never_cross_the_page_bottom(rows in 1usize..300) {
        let layout = PdfLayout::default();
        let mut flow = PageFlow::new(&layout);
        for _ in 0..rows {
            flow.reserve(layout.row_height);
            prop_assert!(flow.cursor().position() + layout.row_height <= layout.page_bottom);
            flow.advance(layout.row_height);
        }
    }
}

// Property: one workbook row per input item, in input order
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn top_products_keep_input_order(names in prop::collection::vec(product_name_strategy(), 1..60)) {
        let products: Vec<Value> = names
            .iter()
            .map(|name| json!({ "productName": name, "quantity": 1, "revenue": 1.0 }))
            .collect();
        let req = request(json!({
            "reportType": "sales",
            "summary": { "dateRange": period() },
            "topProducts": products
        }));

        let sheet = TabularWorkbookRenderer::default().lay_out(&req).unwrap();
        let first = sheet.find_section("Top Products").unwrap() + 2;
        for (n, name) in names.iter().enumerate() {
            let cell = sheet.cell(first + n as u32, 1).and_then(|c| c.value.as_text());
            prop_assert_eq!(cell, Some(name.as_str()));
        }
        prop_assert!(sheet.cell(first + names.len() as u32, 1).is_none());
    }

    #[test]
    fn daily_average_is_total_over_transactions(days in prop::collection::vec(day_strategy(), 1..28)) {
        let sheet = TabularWorkbookRenderer::default()
            .lay_out(&request(sales_with_days(&days)))
            .unwrap();
        let first = sheet.find_section("Daily Sales Breakdown").unwrap() + 2;

        for (n, (total, transactions)) in days.iter().enumerate() {
            let average = sheet
                .cell(first + n as u32, 4)
                .and_then(|c| c.value.as_number())
                .unwrap();
            let expected = if *transactions == 0 { 0.0 } else { total / *transactions as f64 };
            prop_assert!((average - expected).abs() < 1e-9);
            prop_assert!(average.is_finite());
        }
    }
}
