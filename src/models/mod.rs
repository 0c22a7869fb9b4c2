//! Report data contracts.
//!
//! These are the fully aggregated payloads produced upstream by the reporting
//! service. They are transient: built for one render call and dropped after it.

pub mod common;
pub mod inventory;
pub mod movement;
pub mod sales;
pub mod transfers;

pub use common::{parse_flexible_datetime, DateRange};
pub use inventory::{AlertRow, InventoryReportData, InventorySummary, ShopStockRow, StoreStockRow};
pub use movement::{ActivityRow, MovementAgg, MovementReportData, MovementSummary};
pub use sales::{DailyAgg, ProductRevenueRow, SalesReportData, SalesSummary, ShopAgg};
pub use transfers::{FrequencyRow, TransferReportData, TransferRow, TransferStatus, TransferSummary};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::ReportError;
use crate::reports::ReportKind;

/// A report to render, discriminated by `reportType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reportType", rename_all = "camelCase")]
pub enum ReportRequest {
    Inventory(InventoryReportData),
    Sales(SalesReportData),
    Transfers(TransferReportData),
    ProductMovement(MovementReportData),
}

impl ReportRequest {
    /// Parses a request from a JSON value.
    ///
    /// Missing required fields (`summary`, mandatory row collections) and
    /// wrongly shaped values surface as [`ReportError::MalformedInput`].
    pub fn from_json(value: serde_json::Value) -> Result<Self, ReportError> {
        serde_json::from_value(value).map_err(|e| ReportError::MalformedInput(e.to_string()))
    }

    pub fn from_slice(payload: &[u8]) -> Result<Self, ReportError> {
        serde_json::from_slice(payload).map_err(|e| ReportError::MalformedInput(e.to_string()))
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Inventory(_) => ReportKind::Inventory,
            Self::Sales(_) => ReportKind::Sales,
            Self::Transfers(_) => ReportKind::Transfers,
            Self::ProductMovement(_) => ReportKind::ProductMovement,
        }
    }

    pub fn date_range(&self) -> &DateRange {
        match self {
            Self::Inventory(data) => &data.summary.date_range,
            Self::Sales(data) => &data.summary.date_range,
            Self::Transfers(data) => &data.summary.date_range,
            Self::ProductMovement(data) => &data.summary.date_range,
        }
    }

    /// Eager validation run by every renderer before anything is drawn.
    pub fn validate(&self) -> Result<(), ReportError> {
        match self {
            Self::Inventory(data) => data.validate()?,
            Self::Sales(data) => data.validate()?,
            Self::Transfers(data) => data.validate()?,
            Self::ProductMovement(data) => data.validate()?,
        }
        Ok(())
    }
}
