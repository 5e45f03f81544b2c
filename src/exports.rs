//! Snapshot exports: CSV and PDF renderings of a full entity listing.
//!
//! Exports are bounded by [`EXPORT_ROW_CAP`] rows and rendered in memory;
//! the handlers stream the finished buffer as an attachment.

use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Rect, Rgb};

use crate::errors::ServiceError;

/// Maximum number of rows included in a snapshot export.
pub const EXPORT_ROW_CAP: u64 = 10_000;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const TABLE_LEFT_MM: f32 = 14.0;
const TABLE_WIDTH_MM: f32 = 182.0;
const ROW_HEIGHT_MM: f32 = 7.0;
const BOTTOM_MARGIN_MM: f32 = 25.0;

const BRAND_NAME: &str = "DEPOT BACK OFFICE";

fn brand_color() -> Color {
    // lavender
    Color::Rgb(Rgb::new(128.0 / 255.0, 90.0 / 255.0, 213.0 / 255.0, None))
}

fn zebra_color() -> Color {
    // peach
    Color::Rgb(Rgb::new(254.0 / 255.0, 215.0 / 255.0, 215.0 / 255.0, None))
}

fn white() -> Color {
    Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn gray() -> Color {
    Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None))
}

/// A rendered-ready table: title, column headers and stringified rows.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Builds a comma-delimited payload with a UTF-8 BOM so spreadsheet tools
/// pick up the encoding.
pub fn to_csv(snapshot: &TableSnapshot) -> String {
    let mut out = String::from("\u{feff}");

    out.push_str(
        &snapshot
            .headers
            .iter()
            .map(|h| escape_field(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push_str("\r\n");

    for row in &snapshot.rows {
        out.push_str(
            &row.iter()
                .map(|f| escape_field(f))
                .collect::<Vec<_>>()
                .join(","),
        );
        out.push_str("\r\n");
    }

    out
}

fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// Rough width of Helvetica text in millimetres, good enough for centering
/// and truncation decisions.
fn approx_text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * font_size_pt * 0.5 * 0.3528
}

fn truncated(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        let kept: String = value.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        value.to_string()
    }
}

struct ReportFonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Draws the brand band, the report title and the table header row; returns
/// the y cursor positioned on the first data row.
fn draw_page_chrome(
    layer: &PdfLayerReference,
    fonts: &ReportFonts,
    title: &str,
    headers: &[String],
    col_width: f32,
) -> f32 {
    layer.set_fill_color(brand_color());
    layer.add_rect(
        Rect::new(
            Mm(0.0),
            Mm(PAGE_HEIGHT_MM - 15.0),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
        )
        .with_mode(PaintMode::Fill),
    );

    layer.set_fill_color(white());
    let brand_x = (PAGE_WIDTH_MM - approx_text_width_mm(BRAND_NAME, 18.0)) / 2.0;
    layer.use_text(
        BRAND_NAME,
        18.0,
        Mm(brand_x),
        Mm(PAGE_HEIGHT_MM - 10.0),
        &fonts.bold,
    );

    layer.set_fill_color(black());
    let title_x = (PAGE_WIDTH_MM - approx_text_width_mm(title, 14.0)) / 2.0;
    layer.use_text(title, 14.0, Mm(title_x), Mm(PAGE_HEIGHT_MM - 35.0), &fonts.bold);

    // table header row
    let header_top = PAGE_HEIGHT_MM - 45.0;
    layer.set_fill_color(brand_color());
    layer.add_rect(
        Rect::new(
            Mm(TABLE_LEFT_MM),
            Mm(header_top - ROW_HEIGHT_MM),
            Mm(TABLE_LEFT_MM + TABLE_WIDTH_MM),
            Mm(header_top),
        )
        .with_mode(PaintMode::Fill),
    );

    layer.set_fill_color(white());
    let mut x = TABLE_LEFT_MM + 2.0;
    for header in headers {
        let max_chars = (col_width / 1.8) as usize;
        layer.use_text(
            truncated(header, max_chars),
            10.0,
            Mm(x),
            Mm(header_top - 5.0),
            &fonts.bold,
        );
        x += col_width;
    }

    layer.set_fill_color(black());
    header_top - ROW_HEIGHT_MM - 5.0
}

/// Renders the snapshot as a paginated tabular PDF report.
pub fn to_pdf(snapshot: &TableSnapshot) -> Result<Vec<u8>, ServiceError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        snapshot.title.clone(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let fonts = ReportFonts {
        regular: add_font(&doc, BuiltinFont::Helvetica)?,
        bold: add_font(&doc, BuiltinFont::HelveticaBold)?,
    };

    let columns = snapshot.headers.len().max(1);
    let col_width = TABLE_WIDTH_MM / columns as f32;
    let max_chars = (col_width / 1.8) as usize;

    let mut pages = vec![(first_page, first_layer)];
    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = draw_page_chrome(&layer, &fonts, &snapshot.title, &snapshot.headers, col_width);

    for (index, row) in snapshot.rows.iter().enumerate() {
        if y < BOTTOM_MARGIN_MM {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            pages.push((page, page_layer));
            layer = doc.get_page(page).get_layer(page_layer);
            y = draw_page_chrome(&layer, &fonts, &snapshot.title, &snapshot.headers, col_width);
        }

        if index % 2 == 0 {
            layer.set_fill_color(zebra_color());
            layer.add_rect(
                Rect::new(
                    Mm(TABLE_LEFT_MM),
                    Mm(y - 1.5),
                    Mm(TABLE_LEFT_MM + TABLE_WIDTH_MM),
                    Mm(y + ROW_HEIGHT_MM - 2.5),
                )
                .with_mode(PaintMode::Fill),
            );
            layer.set_fill_color(black());
        }

        let mut x = TABLE_LEFT_MM + 2.0;
        for cell in row {
            layer.use_text(truncated(cell, max_chars), 9.0, Mm(x), Mm(y), &fonts.regular);
            x += col_width;
        }

        y -= ROW_HEIGHT_MM;
    }

    // footer with final page count, once every page exists
    let total_pages = pages.len();
    for (number, (page, page_layer)) in pages.iter().enumerate() {
        let footer_layer = doc.get_page(*page).get_layer(*page_layer);
        footer_layer.set_fill_color(gray());
        let text = format!("Page {} / {total_pages}", number + 1);
        let x = (PAGE_WIDTH_MM - approx_text_width_mm(&text, 8.0)) / 2.0;
        footer_layer.use_text(text, 8.0, Mm(x), Mm(7.0), &fonts.regular);

        let brand_line = format!("{BRAND_NAME} - Back Office");
        let bx = (PAGE_WIDTH_MM - approx_text_width_mm(&brand_line, 8.0)) / 2.0;
        footer_layer.use_text(brand_line, 8.0, Mm(bx), Mm(4.0), &fonts.regular);
    }

    doc.save_to_bytes()
        .map_err(|e| ServiceError::InternalError(format!("PDF rendering failed: {e}")))
}

fn add_font(
    doc: &PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, ServiceError> {
    doc.add_builtin_font(font)
        .map_err(|e| ServiceError::InternalError(format!("PDF font loading failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rows: usize) -> TableSnapshot {
        TableSnapshot {
            title: "Clients Report".to_string(),
            headers: vec!["Name".to_string(), "Email".to_string()],
            rows: (0..rows)
                .map(|i| vec![format!("Client {i}"), format!("client{i}@example.com")])
                .collect(),
        }
    }

    #[test]
    fn csv_starts_with_bom_and_header() {
        let csv = to_csv(&snapshot(1));
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv.contains("Name,Email"));
        assert!(csv.contains("Client 0,client0@example.com"));
    }

    #[test]
    fn csv_escapes_delimiters_and_quotes() {
        let snap = TableSnapshot {
            title: "t".to_string(),
            headers: vec!["h".to_string()],
            rows: vec![vec!["a,b".to_string()], vec!["say \"hi\"".to_string()]],
        };
        let csv = to_csv(&snap);
        assert!(csv.contains("\"a,b\""));
        assert!(csv.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn pdf_renders_magic_bytes() {
        let bytes = to_pdf(&snapshot(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_tables_paginate() {
        // enough rows to overflow one A4 page
        let bytes = to_pdf(&snapshot(60)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn truncation_keeps_cells_bounded() {
        assert_eq!(truncated("short", 12), "short");
        assert_eq!(truncated("a very long cell value", 12), "a very lo...");
    }
}
