//! Report rendering: format-independent layout plus one renderer per output format.

pub mod clock;
pub mod document;
pub mod format;
pub mod layout;
pub mod pdf;
pub mod sections;
pub mod workbook;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

use crate::errors::ReportError;
use crate::models::ReportRequest;

pub use clock::{Clock, FixedClock, SystemClock};
pub use document::{Page, PageFlow, PaginatedDocumentRenderer};
pub use layout::{CellValue, LayoutCursor, ReportKind, ReportManifest, Section};
pub use sections::SectionedDocumentBuilder;
pub use workbook::{SheetLayout, TabularWorkbookRenderer};

/// Output format requested by a caller.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ReportFormat {
    #[strum(serialize = "pdf")]
    Pdf,
    #[serde(alias = "xlsx")]
    #[strum(to_string = "excel", serialize = "xlsx")]
    Excel,
    #[strum(serialize = "json")]
    Json,
}

impl ReportFormat {
    /// Parses a format name, accepting `xlsx` as an alias of `excel`.
    pub fn parse(value: &str) -> Result<Self, ReportError> {
        Self::from_str(value.trim()).map_err(|_| ReportError::UnsupportedFormat(value.to_string()))
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Json => "application/json",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
            Self::Json => "json",
        }
    }
}

/// A rendered report, fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub format: ReportFormat,
    pub kind: ReportKind,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub fn new(format: ReportFormat, kind: ReportKind, bytes: Vec<u8>) -> Self {
        Self {
            format,
            kind,
            bytes,
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn file_extension(&self) -> &'static str {
        self.format.file_extension()
    }

    /// Download name such as `inventory-report-2024-01-31.pdf`
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!(
            "{}-report-{}.{}",
            self.kind.slug(),
            date.format("%Y-%m-%d"),
            self.file_extension()
        )
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Turns a report request into a finished document.
///
/// Implementations validate before drawing anything and either return a
/// complete document or an error, never a partial buffer.
pub trait ReportRenderer: Send + Sync {
    fn format(&self) -> ReportFormat;

    fn render(&self, request: &ReportRequest) -> Result<RenderedDocument, ReportError>;
}

/// Echoes the validated request as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    #[instrument(skip(self, request), fields(kind = %request.kind()))]
    fn render(&self, request: &ReportRequest) -> Result<RenderedDocument, ReportError> {
        request.validate()?;
        let bytes = serde_json::to_vec_pretty(request)
            .map_err(|e| ReportError::serialization(ReportFormat::Json, e))?;
        Ok(RenderedDocument::new(ReportFormat::Json, request.kind(), bytes))
    }
}
