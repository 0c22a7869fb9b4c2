use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::clock::{Clock, SystemClock};
use super::format::fit_text;
use super::layout::{CellValue, LayoutCursor, Palette, ReportManifest, Rgb, Section, StatusTone};
use super::pdf::write_pdf;
use super::sections::SectionedDocumentBuilder;
use super::{RenderedDocument, ReportFormat, ReportRenderer};
use crate::config::{PdfLayout, ReportConfig};
use crate::errors::ReportError;
use crate::models::ReportRequest;

// Fixed header positions, top-down, on the first page only
const COMPANY_Y: f32 = 50.0;
const REPORT_TITLE_Y: f32 = 78.0;
const PERIOD_Y: f32 = 100.0;
const GENERATED_Y: f32 = 115.0;
/// Where the running cursor takes over from the fixed header
const SUMMARY_Y: f32 = 145.0;

const TITLE_SIZE: f32 = 20.0;
const REPORT_TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 13.0;
const TEXT_SIZE: f32 = 11.0;
const TABLE_SIZE: f32 = 9.0;
const FOOTER_SIZE: f32 = 9.0;
const SUMMARY_VALUE_OFFSET: f32 = 160.0;
const CELL_PADDING: f32 = 3.0;
/// Average Helvetica advance as a fraction of the font size
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// Text placed with its top edge at `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font: Font,
    pub size: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextRun),
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        color: Rgb,
    },
}

/// Drawing operations of one page, editable until serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|run| run.text == needle)
    }
}

pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVERAGE_GLYPH_WIDTH
}

fn max_chars(width: f32, size: f32) -> usize {
    (((width - 2.0 * CELL_PADDING) / (size * AVERAGE_GLYPH_WIDTH)).floor() as usize).max(1)
}

/// Vertical flow over a growing list of pages.
///
/// Content is placed at the cursor; [`PageFlow::reserve`] is the page-break
/// check and must be called before every row.
#[derive(Debug)]
pub struct PageFlow<'a> {
    layout: &'a PdfLayout,
    pages: Vec<Page>,
    cursor: LayoutCursor<f32>,
}

impl<'a> PageFlow<'a> {
    pub fn new(layout: &'a PdfLayout) -> Self {
        Self {
            layout,
            pages: vec![Page::default()],
            cursor: LayoutCursor::at(layout.top_margin),
        }
    }

    pub fn cursor(&self) -> LayoutCursor<f32> {
        self.cursor
    }

    pub fn move_to(&mut self, cursor: LayoutCursor<f32>) {
        self.cursor = cursor;
    }

    pub fn advance(&mut self, by: f32) {
        self.cursor = self.cursor.advance(by);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn start_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = LayoutCursor::at(self.layout.top_margin);
    }

    /// Starts a new page when `height` no longer fits above the page bottom.
    /// Returns `true` if a break happened.
    pub fn reserve(&mut self, height: f32) -> bool {
        if self.cursor.position() + height > self.layout.page_bottom {
            self.start_page();
            true
        } else {
            false
        }
    }

    fn current(&mut self) -> &mut Page {
        // there is always at least one page
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn text_at(&mut self, x: f32, y: f32, text: impl Into<String>, font: Font, size: f32, color: Rgb) {
        self.current().ops.push(DrawOp::Text(TextRun {
            x,
            y,
            text: text.into(),
            font,
            size,
            color,
        }));
    }

    /// Text at the cursor's vertical position
    pub fn text(&mut self, x: f32, text: impl Into<String>, font: Font, size: f32, color: Rgb) {
        let y = self.cursor.position();
        self.text_at(x, y, text, font, size, color);
    }

    pub fn fill(&mut self, x: f32, width: f32, height: f32, color: Rgb) {
        let y = self.cursor.position();
        self.current().ops.push(DrawOp::Fill {
            x,
            y,
            width,
            height,
            color,
        });
    }

    pub fn rule(&mut self, x1: f32, x2: f32, color: Rgb) {
        let y = self.cursor.position();
        self.current().ops.push(DrawOp::Rule { x1, x2, y, color });
    }

    /// Second pass: one "Page X of N" stamp per page, once the total is known.
    pub fn stamp_footers(&mut self) {
        let total = self.pages.len();
        let layout = self.layout;
        for (idx, page) in self.pages.iter_mut().enumerate() {
            let text = format!("Page {} of {}", idx + 1, total);
            let x = (layout.page_width - text_width(&text, FOOTER_SIZE)) / 2.0;
            page.ops.push(DrawOp::Text(TextRun {
                x,
                y: layout.footer_y,
                text,
                font: Font::Regular,
                size: FOOTER_SIZE,
                color: Rgb::GREY,
            }));
        }
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}

/// Lays a report out as a flowing, paginated document: a fixed header, a
/// summary block on a running cursor, then one table per non-empty section,
/// breaking pages row by row.
#[derive(Clone)]
pub struct PaginatedDocumentRenderer {
    builder: SectionedDocumentBuilder,
    layout: PdfLayout,
    company_name: String,
    clock: Arc<dyn Clock>,
}

impl Default for PaginatedDocumentRenderer {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl std::fmt::Debug for PaginatedDocumentRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedDocumentRenderer")
            .field("layout", &self.layout)
            .field("company_name", &self.company_name)
            .finish_non_exhaustive()
    }
}

impl PaginatedDocumentRenderer {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            builder: SectionedDocumentBuilder::new(config.limits.clone()),
            layout: config.pdf.clone(),
            company_name: config.company_name.clone(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates the request and produces the pages without serializing them.
    pub fn lay_out(&self, request: &ReportRequest) -> Result<Vec<Page>, ReportError> {
        request.validate()?;
        let manifest = self.builder.build(request);
        Ok(self.lay_out_manifest(&manifest, self.clock.now()))
    }

    pub fn lay_out_manifest(&self, manifest: &ReportManifest, generated_at: DateTime<Utc>) -> Vec<Page> {
        let layout = &self.layout;
        let palette = manifest.palette();
        let mut flow = PageFlow::new(layout);

        self.write_header(&mut flow, manifest, generated_at);

        // summary: running cursor from here on
        flow.move_to(LayoutCursor::at(SUMMARY_Y));
        flow.text(layout.margin_left, "Summary", Font::Bold, HEADING_SIZE, palette.accent);
        flow.advance(layout.line_height);
        for item in &manifest.summary {
            flow.reserve(layout.line_height);
            flow.text(layout.margin_left, format!("{}:", item.label), Font::Bold, TEXT_SIZE, Rgb::BLACK);
            flow.text(
                layout.margin_left + SUMMARY_VALUE_OFFSET,
                item.value.display(),
                Font::Regular,
                TEXT_SIZE,
                Rgb::BLACK,
            );
            flow.advance(layout.line_height);
        }

        for section in &manifest.sections {
            self.write_section(&mut flow, section, palette);
        }

        flow.stamp_footers();
        flow.finish()
    }

    fn write_header(&self, flow: &mut PageFlow<'_>, manifest: &ReportManifest, generated_at: DateTime<Utc>) {
        self.centered_line(flow, COMPANY_Y, &self.company_name, Font::Bold, TITLE_SIZE, Rgb::BLACK);
        self.centered_line(
            flow,
            REPORT_TITLE_Y,
            &manifest.title,
            Font::Bold,
            REPORT_TITLE_SIZE,
            manifest.palette().accent,
        );

        let period = format!("Period: {}", manifest.period);
        self.centered_line(flow, PERIOD_Y, &period, Font::Regular, TEXT_SIZE, Rgb::BLACK);

        let generated = format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
        self.centered_line(flow, GENERATED_Y, &generated, Font::Regular, TABLE_SIZE, Rgb::GREY);
    }

    /// Centres `text` between the margins, shortening it to the content width.
    fn centered_line(&self, flow: &mut PageFlow<'_>, y: f32, text: &str, font: Font, size: f32, color: Rgb) {
        let layout = &self.layout;
        let text = fit_text(text, max_chars(layout.content_width(), size));
        let x = ((layout.page_width - text_width(&text, size)) / 2.0).max(layout.margin_left);
        flow.text_at(x, y, text, font, size, color);
    }

    fn write_section(&self, flow: &mut PageFlow<'_>, section: &Section, palette: Palette) {
        let rows = section.document_rows();
        if rows.is_empty() {
            return;
        }

        let layout = &self.layout;
        let offsets = section.column_offsets(layout.margin_left);
        let table_width: f32 = section.columns.iter().map(|c| c.width).sum();

        flow.advance(layout.line_height);
        // keep the title, the header and the first row together
        flow.reserve(layout.line_height + 2.0 * layout.row_height);
        flow.text(layout.margin_left, section.title.clone(), Font::Bold, HEADING_SIZE, palette.accent);
        flow.advance(layout.line_height);

        flow.fill(layout.margin_left, table_width, layout.row_height, palette.accent);
        for (column, x) in section.columns.iter().zip(&offsets) {
            flow.text(
                x + CELL_PADDING,
                fit_text(&column.header, max_chars(column.width, TABLE_SIZE)),
                Font::Bold,
                TABLE_SIZE,
                palette.header_text,
            );
        }
        flow.advance(layout.row_height);

        for row in rows {
            flow.reserve(layout.row_height);
            for ((cell, column), x) in row.iter().zip(&section.columns).zip(&offsets) {
                let (font, color) = cell_style(cell);
                flow.text(
                    x + CELL_PADDING,
                    fit_text(&cell.display(), max_chars(column.width, TABLE_SIZE)),
                    font,
                    TABLE_SIZE,
                    color,
                );
            }
            flow.advance(layout.row_height);
            flow.rule(layout.margin_left, layout.margin_left + table_width, Rgb(0xDDDDDD));
        }
    }
}

fn cell_style(cell: &CellValue) -> (Font, Rgb) {
    match cell.tone() {
        Some(StatusTone::Neutral) | None => (Font::Regular, Rgb::BLACK),
        Some(tone) => (Font::Bold, tone.text()),
    }
}

impl ReportRenderer for PaginatedDocumentRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }

    #[instrument(skip(self, request), fields(kind = %request.kind()))]
    fn render(&self, request: &ReportRequest) -> Result<RenderedDocument, ReportError> {
        let pages = self.lay_out(request)?;
        debug!(pages = pages.len(), "Document layout complete");
        let bytes = write_pdf(&pages, &self.layout, request.kind().title());
        Ok(RenderedDocument::new(ReportFormat::Pdf, request.kind(), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use crate::reports::clock::FixedClock;
    use chrono::{DateTime, TimeZone};

    fn renderer() -> PaginatedDocumentRenderer {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap());
        PaginatedDocumentRenderer::default().with_clock(Arc::new(clock))
    }

    fn range() -> DateRange {
        DateRange::new(
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap(),
            DateTime::parse_from_rfc3339("2024-01-31T00:00:00Z").unwrap(),
        )
    }

    fn inventory(alerts: Vec<AlertRow>) -> ReportRequest {
        ReportRequest::Inventory(InventoryReportData {
            summary: InventorySummary {
                date_range: range(),
                total_products: 2,
                total_quantity: 20,
                inventory_value: 199.5,
                low_stock_count: alerts.len() as u64,
                out_of_stock_count: 0,
                total_locations: 2,
            },
            shop_inventory: vec![ShopStockRow {
                product_name: Some("Toaster".into()),
                quantity: Some(20),
                price: Some(9.975),
                ..Default::default()
            }],
            low_stock_alerts: alerts,
            store_inventory: vec![],
        })
    }

    fn transfers(count: usize) -> ReportRequest {
        ReportRequest::Transfers(TransferReportData {
            summary: TransferSummary {
                date_range: range(),
                total_transfers: count as u64,
                completed_transfers: count as u64,
                pending_transfers: 0,
                rejected_transfers: 0,
                total_items_transferred: count as u64,
            },
            transfers: (0..count)
                .map(|n| TransferRow {
                    product_name: Some(format!("Item {:03}", n)),
                    quantity: Some(1),
                    status: Some(TransferStatus::Completed),
                    ..Default::default()
                })
                .collect(),
            frequent_transfers: vec![],
        })
    }

    #[test]
    fn header_is_at_fixed_positions() {
        let pages = renderer().lay_out(&inventory(vec![])).unwrap();
        let first = &pages[0];

        let company = first.texts().find(|t| t.text == "Inventory Management System").unwrap();
        assert_eq!(company.y, COMPANY_Y);
        let title = first.texts().find(|t| t.text == "Inventory Report").unwrap();
        assert_eq!(title.y, REPORT_TITLE_Y);
        assert!(first.contains_text("Period: 2024-01-01 to 2024-01-31"));
        assert!(first.contains_text("Generated: 2024-02-01 09:30 UTC"));
    }

    #[test]
    fn summary_uses_running_cursor() {
        let pages = renderer().lay_out(&inventory(vec![])).unwrap();
        let labels: Vec<f32> = pages[0]
            .texts()
            .filter(|t| t.text.ends_with(':') && t.font == Font::Bold)
            .map(|t| t.y)
            .collect();
        assert_eq!(labels.len(), 6);
        for pair in labels.windows(2) {
            assert_eq!(pair[1] - pair[0], 20.0);
        }
        assert!(pages[0].contains_text("$199.50"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let pages = renderer().lay_out(&inventory(vec![])).unwrap();
        assert!(!pages.iter().any(|p| p.contains_text("Low Stock Alerts")));
        assert!(pages[0].contains_text("Shop Inventory"));

        let pages = renderer()
            .lay_out(&inventory(vec![AlertRow::default()]))
            .unwrap();
        assert!(pages[0].contains_text("Low Stock Alerts"));
    }

    #[test]
    fn transfer_table_is_capped_at_thirty_rows() {
        let pages = renderer().lay_out(&transfers(50)).unwrap();
        let names: Vec<String> = pages
            .iter()
            .flat_map(|p| p.texts())
            .filter(|t| t.text.starts_with("Item "))
            .map(|t| t.text.clone())
            .collect();

        assert_eq!(names.len(), 30);
        assert_eq!(names.first().map(String::as_str), Some("Item 000"));
        assert_eq!(names.last().map(String::as_str), Some("Item 029"));
    }

    #[test]
    fn long_tables_continue_at_top_margin() {
        let mut config = ReportConfig::default();
        config.limits.transfer_rows = 200;
        let renderer = PaginatedDocumentRenderer::new(&config);

        let pages = renderer.lay_out(&transfers(120)).unwrap();
        assert!(pages.len() >= 3);

        let first_on_second_page = pages[1]
            .texts()
            .filter(|t| t.text.starts_with("Item "))
            .map(|t| t.y)
            .fold(f32::MAX, f32::min);
        assert_eq!(first_on_second_page, config.pdf.top_margin);

        for page in &pages {
            for run in page.texts().filter(|t| t.text.starts_with("Item ")) {
                assert!(run.y + config.pdf.row_height <= config.pdf.page_bottom);
            }
        }
    }

    #[test]
    fn every_page_gets_one_footer() {
        let mut config = ReportConfig::default();
        config.limits.transfer_rows = 200;
        let pages = PaginatedDocumentRenderer::new(&config)
            .lay_out(&transfers(150))
            .unwrap();

        let total = pages.len();
        for (idx, page) in pages.iter().enumerate() {
            let footers: Vec<&TextRun> = page
                .texts()
                .filter(|t| t.text.starts_with("Page "))
                .collect();
            assert_eq!(footers.len(), 1);
            assert_eq!(footers[0].text, format!("Page {} of {}", idx + 1, total));
            assert_eq!(footers[0].y, config.pdf.footer_y);
        }
    }

    #[test]
    fn status_cells_are_coloured() {
        let pages = renderer().lay_out(&transfers(1)).unwrap();
        let status = pages[0].texts().find(|t| t.text == "Completed").unwrap();
        assert_eq!(status.color, Rgb(0x006100));
    }

    #[test]
    fn neutral_status_cells_use_body_style() {
        let request = match transfers(2) {
            ReportRequest::Transfers(mut data) => {
                for row in &mut data.transfers {
                    row.date = Some(DateTime::parse_from_rfc3339("2024-01-05T00:00:00Z").unwrap());
                }
                data.transfers[0].status = None;
                data.transfers[1].status = Some(TransferStatus::Other("in transit".into()));
                ReportRequest::Transfers(data)
            }
            _ => unreachable!(),
        };
        let pages = renderer().lay_out(&request).unwrap();

        for label in ["N/A", "In transit"] {
            let cell = pages[0].texts().find(|t| t.text == label).unwrap();
            assert_eq!(cell.font, Font::Regular);
            assert_eq!(cell.color, Rgb::BLACK);
        }
        let completed = pages[0].texts().find(|t| t.text == "Completed");
        assert!(completed.is_none());
    }

    #[test]
    fn long_company_name_stays_within_margins() {
        let config = ReportConfig {
            company_name: "Northern Regional Hardware and Garden Supplies ".repeat(5),
            ..ReportConfig::default()
        };
        let pages = PaginatedDocumentRenderer::new(&config)
            .lay_out(&inventory(vec![]))
            .unwrap();

        let title = pages[0].texts().find(|t| t.y == COMPANY_Y).unwrap();
        assert!(title.text.ends_with("..."));
        assert!(title.x >= config.pdf.margin_left);
        assert!(title.x + text_width(&title.text, title.size) <= config.pdf.page_width - config.pdf.margin_right);
    }

    #[test]
    fn page_flow_breaks_before_crossing_bottom() {
        let layout = PdfLayout::default();
        let mut flow = PageFlow::new(&layout);
        flow.move_to(LayoutCursor::at(690.0));
        assert!(flow.reserve(layout.row_height));
        assert_eq!(flow.page_count(), 2);
        assert_eq!(flow.cursor().position(), layout.top_margin);
        assert!(!flow.reserve(layout.row_height));
    }
}
