use serde::{Deserialize, Serialize};
use std::ops::Add;

use super::format::{format_currency, format_integer};
use crate::models::TransferStatus;

/// The four report variants, each with its own title, file slug and palette.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "kebab-case")]
pub enum ReportKind {
    Inventory,
    Sales,
    Transfers,
    ProductMovement,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Inventory => "Inventory Report",
            Self::Sales => "Sales Report",
            Self::Transfers => "Transfer Report",
            Self::ProductMovement => "Product Movement Report",
        }
    }

    /// Used in download file names, e.g. `product-movement`
    pub fn slug(&self) -> String {
        self.to_string()
    }

    pub fn palette(&self) -> Palette {
        let accent = match self {
            Self::Inventory => Rgb(0x4472C4),
            Self::Sales => Rgb(0x70AD47),
            Self::Transfers => Rgb(0xC00000),
            Self::ProductMovement => Rgb(0x7030A0),
        };
        Palette {
            accent,
            header_text: Rgb::WHITE,
        }
    }
}

/// 24-bit colour, `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFFFFFF);
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const GREY: Rgb = Rgb(0x666666);

    /// Channels scaled to `0.0..=1.0`
    pub fn components(self) -> (f32, f32, f32) {
        let r = ((self.0 >> 16) & 0xFF) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xFF) as f32 / 255.0;
        let b = (self.0 & 0xFF) as f32 / 255.0;
        (r, g, b)
    }
}

/// Per-report colours: header fill and title colour come from `accent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Rgb,
    pub header_text: Rgb,
}

/// Visual treatment of a transfer status cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    Success,
    Warning,
    Danger,
    Neutral,
}

impl StatusTone {
    pub fn for_status(status: &TransferStatus) -> Self {
        match status {
            TransferStatus::Completed => Self::Success,
            TransferStatus::Pending => Self::Warning,
            TransferStatus::Rejected => Self::Danger,
            TransferStatus::Other(_) => Self::Neutral,
        }
    }

    /// Cell background; `None` keeps the body style.
    pub fn fill(&self) -> Option<Rgb> {
        match self {
            Self::Success => Some(Rgb(0xC6EFCE)),
            Self::Warning => Some(Rgb(0xFFD8A8)),
            Self::Danger => Some(Rgb(0xFFC7CE)),
            Self::Neutral => None,
        }
    }

    pub fn text(&self) -> Rgb {
        match self {
            Self::Success => Rgb(0x006100),
            Self::Warning => Rgb(0xC65911),
            Self::Danger => Rgb(0x9C0006),
            Self::Neutral => Rgb::BLACK,
        }
    }
}

/// A typed value placed in a report cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Currency(f64),
    /// `None` when the row carried no status
    Status(Option<TransferStatus>),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Human readable rendering used by the paginated document.
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Integer(value) => format_integer(*value),
            Self::Currency(value) => format_currency(*value),
            Self::Status(Some(status)) => status.label(),
            Self::Status(None) => super::format::NOT_AVAILABLE.to_string(),
        }
    }

    /// Numeric payload, if this is a numeric cell
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Currency(value) => Some(*value),
            _ => None,
        }
    }

    pub fn tone(&self) -> Option<StatusTone> {
        match self {
            Self::Status(Some(status)) => Some(StatusTone::for_status(status)),
            Self::Status(None) => Some(StatusTone::Neutral),
            _ => None,
        }
    }
}

/// A table column. `width` is in points and only drives the paginated layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub width: f32,
}

impl Column {
    pub fn new(header: impl Into<String>, width: f32) -> Self {
        Self {
            header: header.into(),
            width,
        }
    }
}

/// A titled table. Sections are never built for empty collections.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
    /// Rows beyond this are left out of paginated documents
    pub document_row_cap: Option<usize>,
}

impl Section {
    pub fn new(title: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows: Vec::new(),
            document_row_cap: None,
        }
    }

    pub fn with_row_cap(mut self, cap: usize) -> Self {
        self.document_row_cap = Some(cap);
        self
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows placed in a paginated document, after the row cap
    pub fn document_rows(&self) -> &[Vec<CellValue>] {
        match self.document_row_cap {
            Some(cap) if cap < self.rows.len() => &self.rows[..cap],
            _ => &self.rows,
        }
    }

    /// Running sum of the preceding column widths, starting at `origin`.
    pub fn column_offsets(&self, origin: f32) -> Vec<f32> {
        self.columns
            .iter()
            .scan(origin, |x, column| {
                let at = *x;
                *x += column.width;
                Some(at)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryItem {
    pub label: String,
    pub value: CellValue,
}

impl SummaryItem {
    pub fn new(label: impl Into<String>, value: CellValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Format-independent description of one report: fixed parts plus the
/// ordered list of non-empty sections.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportManifest {
    pub kind: ReportKind,
    pub title: String,
    /// `2024-01-01 to 2024-01-31`
    pub period: String,
    pub summary: Vec<SummaryItem>,
    pub sections: Vec<Section>,
    /// Spreadsheet column widths in characters, applied once per sheet
    pub column_widths: Vec<f64>,
}

impl ReportManifest {
    pub fn palette(&self) -> Palette {
        self.kind.palette()
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.title == title)
    }

    /// Widest section, used to size the merged title
    pub fn column_span(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.columns.len())
            .chain(std::iter::once(self.column_widths.len()))
            .max()
            .unwrap_or(0)
    }
}

/// A monotonic layout position: a row index for grids, a vertical offset for pages.
///
/// Section writers take a cursor and hand back the advanced one, so layout
/// order can be checked without producing a document.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LayoutCursor<U> {
    position: U,
}

impl<U> LayoutCursor<U>
where
    U: Copy + Add<Output = U>,
{
    pub fn at(position: U) -> Self {
        Self { position }
    }

    pub fn position(self) -> U {
        self.position
    }

    #[must_use]
    pub fn advance(self, by: U) -> Self {
        Self {
            position: self.position + by,
        }
    }

    /// Leaves `blank` empty units before the next block.
    #[must_use]
    pub fn skip_blank(self, blank: U) -> Self {
        self.advance(blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_advances_monotonically() {
        let start = LayoutCursor::at(3u32);
        let next = start.advance(1).advance(2);
        assert_eq!(start.position(), 3);
        assert_eq!(next.position(), 6);
        assert!(next > start);
    }

    #[test]
    fn column_offsets_are_running_sums() {
        let section = Section::new(
            "Widths",
            vec![
                Column::new("A", 100.0),
                Column::new("B", 50.0),
                Column::new("C", 25.0),
            ],
        );
        assert_eq!(section.column_offsets(50.0), vec![50.0, 150.0, 200.0]);
    }

    #[test]
    fn document_rows_respect_cap() {
        let mut section = Section::new("Capped", vec![Column::new("N", 10.0)]).with_row_cap(2);
        for n in 0..5 {
            section.push_row(vec![CellValue::Integer(n)]);
        }
        assert_eq!(section.rows.len(), 5);
        assert_eq!(section.document_rows().len(), 2);
        assert_eq!(section.document_rows()[1], vec![CellValue::Integer(1)]);
    }

    #[test]
    fn palettes_are_distinct_per_kind() {
        use std::collections::HashSet;
        use strum::IntoEnumIterator;

        let accents: HashSet<u32> = ReportKind::iter().map(|k| k.palette().accent.0).collect();
        assert_eq!(accents.len(), 4);
    }

    #[test]
    fn status_tones_are_distinct() {
        let completed = CellValue::Status(Some(TransferStatus::Completed)).tone();
        let pending = CellValue::Status(Some(TransferStatus::Pending)).tone();
        let rejected = CellValue::Status(Some(TransferStatus::Rejected)).tone();
        let other = CellValue::Status(Some(TransferStatus::Other("lost".into()))).tone();

        assert_eq!(completed, Some(StatusTone::Success));
        assert_eq!(pending, Some(StatusTone::Warning));
        assert_eq!(rejected, Some(StatusTone::Danger));
        assert_eq!(other, Some(StatusTone::Neutral));
        assert!(StatusTone::Neutral.fill().is_none());
    }

    #[test]
    fn slugs_are_kebab_case() {
        assert_eq!(ReportKind::ProductMovement.slug(), "product-movement");
        assert_eq!(ReportKind::Inventory.slug(), "inventory");
    }
}
