use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{flexible_datetime, DateRange};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MovementSummary {
    #[validate]
    pub date_range: DateRange,
    #[serde(default)]
    pub total_activities: u64,
    #[serde(default)]
    pub total_incoming: i64,
    #[serde(default)]
    pub total_outgoing: i64,
    #[serde(default)]
    pub products_tracked: u64,
}

impl MovementSummary {
    pub fn net_movement(&self) -> i64 {
        self.total_incoming - self.total_outgoing
    }
}

/// One stock event: a sale, restock, transfer leg or adjustment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRow {
    #[serde(default, deserialize_with = "flexible_datetime::deserialize_option")]
    pub timestamp: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub performed_by: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementAgg {
    #[serde(default)]
    pub incoming: i64,
    #[serde(default)]
    pub outgoing: i64,
}

impl MovementAgg {
    pub fn net(&self) -> i64 {
        self.incoming - self.outgoing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MovementReportData {
    #[validate]
    pub summary: MovementSummary,
    pub recent_activities: Vec<ActivityRow>,
    #[serde(default)]
    pub product_movement: IndexMap<String, MovementAgg>,
}
