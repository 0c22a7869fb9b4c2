use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};

use super::document::{DrawOp, Font, Page, TextRun};
use crate::config::PdfLayout;

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");
/// Distance from the top of a text line to its baseline, as a fraction of the size
const ASCENT: f32 = 0.8;

/// Maps text to WinAnsiEncoding bytes: Latin-1 plus the typographic
/// characters Windows-1252 places at 0x80..=0x9F. Anything else becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' | '\u{A0}'..='\u{FF}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

fn font_name(font: Font) -> Name<'static> {
    match font {
        Font::Regular => REGULAR,
        Font::Bold => BOLD,
    }
}

fn draw_text(content: &mut Content, run: &TextRun, page_height: f32) {
    let (r, g, b) = run.color.components();
    let baseline = page_height - run.y - run.size * ASCENT;
    content.set_fill_rgb(r, g, b);
    content
        .begin_text()
        .set_font(font_name(run.font), run.size)
        .next_line(run.x, baseline)
        .show(Str(&encode_win_ansi(&run.text)))
        .end_text();
}

fn page_content(page: &Page, page_height: f32) -> Vec<u8> {
    let mut content = Content::new();
    for op in &page.ops {
        match op {
            DrawOp::Text(run) => draw_text(&mut content, run, page_height),
            DrawOp::Fill {
                x,
                y,
                width,
                height,
                color,
            } => {
                let (r, g, b) = color.components();
                content.save_state();
                content.set_fill_rgb(r, g, b);
                content.rect(*x, page_height - y - height, *width, *height);
                content.fill_nonzero();
                content.restore_state();
            }
            DrawOp::Rule { x1, x2, y, color } => {
                let (r, g, b) = color.components();
                content.save_state();
                content.set_line_width(0.5);
                content.set_stroke_rgb(r, g, b);
                content.move_to(*x1, page_height - y);
                content.line_to(*x2, page_height - y);
                content.stroke();
                content.restore_state();
            }
        }
    }
    content.finish().to_vec()
}

/// Serializes laid out pages. Content streams are left uncompressed.
pub fn write_pdf(pages: &[Page], layout: &PdfLayout, title: &str) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next = 1;
    let mut alloc = || {
        let id = Ref::new(next);
        next += 1;
        id
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let regular_id = alloc();
    let bold_id = alloc();
    let page_ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc(), alloc())).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    for (page, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        {
            let mut entry = pdf.page(*page_id);
            entry
                .media_box(Rect::new(0.0, 0.0, layout.page_width, layout.page_height))
                .parent(pages_id)
                .contents(*content_id);
            let mut resources = entry.resources();
            let mut fonts = resources.fonts();
            fonts.pair(REGULAR, regular_id);
            fonts.pair(BOLD, bold_id);
        }
        pdf.stream(*content_id, &page_content(page, layout.page_height));
    }

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(concat!("inventory-reports ", env!("CARGO_PKG_VERSION"))));

    pdf.finish()
}
