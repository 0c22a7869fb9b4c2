use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{flexible_datetime, DateRange};

/// Lifecycle state of a stock transfer between two locations.
///
/// Unrecognised values are kept verbatim in `Other` instead of failing the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransferStatus {
    Completed,
    Pending,
    Rejected,
    Other(String),
}

impl TransferStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
            Self::Other(raw) => raw,
        }
    }

    /// Display label, e.g. `Completed`
    pub fn label(&self) -> String {
        let raw = self.as_str().trim();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "N/A".to_string(),
        }
    }
}

impl From<String> for TransferStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "completed" => Self::Completed,
            "pending" => Self::Pending,
            "rejected" => Self::Rejected,
            _ => Self::Other(raw),
        }
    }
}

impl From<TransferStatus> for String {
    fn from(status: TransferStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferSummary {
    #[validate]
    pub date_range: DateRange,
    #[serde(default)]
    pub total_transfers: u64,
    #[serde(default)]
    pub completed_transfers: u64,
    #[serde(default)]
    pub pending_transfers: u64,
    #[serde(default)]
    pub rejected_transfers: u64,
    #[serde(default)]
    pub total_items_transferred: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRow {
    #[serde(default, deserialize_with = "flexible_datetime::deserialize_option")]
    pub date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub from_location: Option<String>,
    #[serde(default)]
    pub to_location: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub status: Option<TransferStatus>,
}

/// A product/route pair that is transferred often.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyRow {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub from_location: Option<String>,
    #[serde(default)]
    pub to_location: Option<String>,
    #[serde(default)]
    pub transfer_count: u64,
    #[serde(default)]
    pub total_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferReportData {
    #[validate]
    pub summary: TransferSummary,
    pub transfers: Vec<TransferRow>,
    #[serde(default)]
    pub frequent_transfers: Vec<FrequencyRow>,
}
