use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use tracing::{debug, instrument};

use super::layout::{CellValue, LayoutCursor, Palette, ReportManifest, Rgb, Section, StatusTone};
use super::sections::SectionedDocumentBuilder;
use super::{RenderedDocument, ReportFormat, ReportRenderer};
use crate::config::ReportLimits;
use crate::errors::ReportError;
use crate::models::ReportRequest;

/// First row of the key/value summary block
pub const SUMMARY_START_ROW: u32 = 3;
/// Blank rows left between two blocks
const SECTION_GAP: u32 = 2;
const DEFAULT_COLUMN_WIDTH: f64 = 15.0;
const CURRENCY_FORMAT: &str = "$#,##0.00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Title,
    Period,
    SectionTitle,
    Header,
    Label,
    Body,
    Currency,
    Status(StatusTone),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetValue {
    Text(String),
    Number(f64),
}

impl SheetValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetCell {
    pub row: u32,
    pub col: u16,
    pub value: SheetValue,
    pub style: CellStyle,
}

/// A single-row merged range
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRange {
    pub row: u32,
    pub first_col: u16,
    pub last_col: u16,
    pub text: String,
    pub style: CellStyle,
}

/// In-memory grid produced before any bytes are written.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    pub palette: Palette,
    pub cells: Vec<SheetCell>,
    pub merges: Vec<MergedRange>,
    pub column_widths: Vec<f64>,
}

impl SheetLayout {
    pub fn cell(&self, row: u32, col: u16) -> Option<&SheetCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: u32) -> Vec<&SheetCell> {
        let mut cells: Vec<&SheetCell> = self.cells.iter().filter(|c| c.row == row).collect();
        cells.sort_by_key(|c| c.col);
        cells
    }

    /// Row index holding a section title, if the section was written
    pub fn find_section(&self, title: &str) -> Option<u32> {
        self.cells
            .iter()
            .find(|c| c.style == CellStyle::SectionTitle && c.value.as_text() == Some(title))
            .map(|c| c.row)
    }

    pub fn last_row(&self) -> u32 {
        self.cells
            .iter()
            .map(|c| c.row)
            .chain(self.merges.iter().map(|m| m.row))
            .max()
            .unwrap_or(0)
    }

    fn put(&mut self, row: u32, col: u16, value: SheetValue, style: CellStyle) {
        self.cells.push(SheetCell {
            row,
            col,
            value,
            style,
        });
    }
}

/// Lays a report out as a single-sheet workbook: a merged title, a fixed
/// summary block, then one titled table per non-empty section.
#[derive(Debug, Clone, Default)]
pub struct TabularWorkbookRenderer {
    builder: SectionedDocumentBuilder,
}

impl TabularWorkbookRenderer {
    pub fn new(limits: ReportLimits) -> Self {
        Self {
            builder: SectionedDocumentBuilder::new(limits),
        }
    }

    /// Validates the request and produces the grid without serializing it.
    pub fn lay_out(&self, request: &ReportRequest) -> Result<SheetLayout, ReportError> {
        request.validate()?;
        Ok(lay_out_manifest(&self.builder.build(request)))
    }
}

impl ReportRenderer for TabularWorkbookRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Excel
    }

    #[instrument(skip(self, request), fields(kind = %request.kind()))]
    fn render(&self, request: &ReportRequest) -> Result<RenderedDocument, ReportError> {
        let layout = self.lay_out(request)?;
        debug!(
            cells = layout.cells.len(),
            rows = layout.last_row() + 1,
            "Workbook layout complete"
        );
        let bytes = write_xlsx(&layout)?;
        Ok(RenderedDocument::new(ReportFormat::Excel, request.kind(), bytes))
    }
}

pub fn lay_out_manifest(manifest: &ReportManifest) -> SheetLayout {
    let mut sheet = SheetLayout {
        name: manifest.kind.title().to_string(),
        palette: manifest.palette(),
        cells: Vec::new(),
        merges: Vec::new(),
        column_widths: Vec::new(),
    };

    // A merge must cover at least two cells
    let span = manifest.column_span().max(2);
    sheet.merges.push(MergedRange {
        row: 0,
        first_col: 0,
        last_col: (span - 1) as u16,
        text: manifest.title.clone(),
        style: CellStyle::Title,
    });
    sheet.put(
        1,
        0,
        SheetValue::Text(format!("Period: {}", manifest.period)),
        CellStyle::Period,
    );

    let mut cursor = LayoutCursor::at(SUMMARY_START_ROW);
    for item in &manifest.summary {
        let row = cursor.position();
        sheet.put(row, 0, SheetValue::Text(item.label.clone()), CellStyle::Label);
        let (value, style) = sheet_value(&item.value);
        sheet.put(row, 1, value, style);
        cursor = cursor.advance(1);
    }
    cursor = cursor.skip_blank(SECTION_GAP);

    for section in &manifest.sections {
        cursor = write_section(&mut sheet, cursor, section);
    }

    // widths are applied once, after every row is in place
    sheet.column_widths = (0..span)
        .map(|col| {
            manifest
                .column_widths
                .get(col)
                .copied()
                .unwrap_or(DEFAULT_COLUMN_WIDTH)
        })
        .collect();

    sheet
}

fn write_section(
    sheet: &mut SheetLayout,
    cursor: LayoutCursor<u32>,
    section: &Section,
) -> LayoutCursor<u32> {
    if section.is_empty() {
        return cursor;
    }

    sheet.put(
        cursor.position(),
        0,
        SheetValue::Text(section.title.clone()),
        CellStyle::SectionTitle,
    );
    let mut cursor = cursor.advance(1);

    for (col, column) in section.columns.iter().enumerate() {
        sheet.put(
            cursor.position(),
            col as u16,
            SheetValue::Text(column.header.clone()),
            CellStyle::Header,
        );
    }
    cursor = cursor.advance(1);

    for row in &section.rows {
        for (col, cell) in row.iter().enumerate() {
            let (value, style) = sheet_value(cell);
            sheet.put(cursor.position(), col as u16, value, style);
        }
        cursor = cursor.advance(1);
    }

    cursor.skip_blank(SECTION_GAP)
}

fn sheet_value(cell: &CellValue) -> (SheetValue, CellStyle) {
    match cell {
        CellValue::Text(text) => (SheetValue::Text(text.clone()), CellStyle::Body),
        CellValue::Integer(value) => (SheetValue::Number(*value as f64), CellStyle::Body),
        CellValue::Currency(value) => (SheetValue::Number(finite(*value)), CellStyle::Currency),
        CellValue::Status(_) => (
            SheetValue::Text(cell.display()),
            CellStyle::Status(cell.tone().unwrap_or(StatusTone::Neutral)),
        ),
    }
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn color(rgb: Rgb) -> Color {
    Color::RGB(rgb.0)
}

/// Formats for one sheet, built from the report palette.
struct StyleSheet {
    title: Format,
    period: Format,
    section_title: Format,
    header: Format,
    label: Format,
    body: Format,
    currency: Format,
    success: Format,
    warning: Format,
    danger: Format,
}

impl StyleSheet {
    fn new(palette: Palette) -> Self {
        let status = |tone: StatusTone| {
            let mut format = Format::new()
                .set_border(FormatBorder::Thin)
                .set_bold()
                .set_font_color(color(tone.text()));
            if let Some(fill) = tone.fill() {
                format = format.set_background_color(color(fill));
            }
            format
        };

        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_font_color(color(palette.header_text))
                .set_background_color(color(palette.accent))
                .set_align(FormatAlign::Center),
            period: Format::new().set_italic().set_font_color(color(Rgb::GREY)),
            section_title: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_font_color(color(palette.accent)),
            header: Format::new()
                .set_bold()
                .set_font_color(color(palette.header_text))
                .set_background_color(color(palette.accent))
                .set_border(FormatBorder::Thin),
            label: Format::new().set_bold(),
            body: Format::new().set_border(FormatBorder::Thin),
            currency: Format::new()
                .set_border(FormatBorder::Thin)
                .set_num_format(CURRENCY_FORMAT),
            success: status(StatusTone::Success),
            warning: status(StatusTone::Warning),
            danger: status(StatusTone::Danger),
        }
    }

    fn get(&self, style: CellStyle) -> &Format {
        match style {
            CellStyle::Title => &self.title,
            CellStyle::Period => &self.period,
            CellStyle::SectionTitle => &self.section_title,
            CellStyle::Header => &self.header,
            CellStyle::Label => &self.label,
            CellStyle::Body | CellStyle::Status(StatusTone::Neutral) => &self.body,
            CellStyle::Currency => &self.currency,
            CellStyle::Status(StatusTone::Success) => &self.success,
            CellStyle::Status(StatusTone::Warning) => &self.warning,
            CellStyle::Status(StatusTone::Danger) => &self.danger,
        }
    }
}

/// Serializes a laid-out sheet to `.xlsx` bytes, entirely in memory.
pub fn write_xlsx(layout: &SheetLayout) -> Result<Vec<u8>, ReportError> {
    let styles = StyleSheet::new(layout.palette);
    let mut workbook = Workbook::new();

    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&layout.name)?;

        for merge in &layout.merges {
            worksheet.merge_range(
                merge.row,
                merge.first_col,
                merge.row,
                merge.last_col,
                &merge.text,
                styles.get(merge.style),
            )?;
        }

        for cell in &layout.cells {
            let format = styles.get(cell.style);
            match &cell.value {
                SheetValue::Text(text) => {
                    worksheet.write_string_with_format(cell.row, cell.col, text, format)?;
                }
                SheetValue::Number(value) => {
                    worksheet.write_number_with_format(cell.row, cell.col, *value, format)?;
                }
            }
        }

        for (col, width) in layout.column_widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
