//! PDF report writer
//!
//! Lays the report out on A4 pages with `printpdf`, using the built-in
//! Helvetica faces so no font program is embedded. Characters the built-in
//! faces cannot show are replaced with `?`.

use super::{
    ReportFormat, ReportRenderer, ReportRequest, FOOTER, GUIDANCE_HEADING, REPORT_TITLE,
    SNAPSHOT_HEADING, TOP_THEMES_HEADING,
};
use crate::error::{Error, Result};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use tracing::debug;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 15.0;
const CELL_PADDING: f32 = 1.0;
const LAYER_NAME: &str = "Report";

const PT_TO_MM: f32 = 25.4 / 72.0;
/// Mean Helvetica advance as a fraction of the font size, rounded up so
/// wrapped lines stay inside the margins
const AVERAGE_GLYPH_EM: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontStyle {
    Regular,
    Bold,
    Italic,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self> {
        let font = |face| {
            doc.add_builtin_font(face)
                .map_err(|e| Error::Render(format!("font unavailable: {e}")))
        };
        Ok(Self {
            regular: font(BuiltinFont::Helvetica)?,
            bold: font(BuiltinFont::HelveticaBold)?,
            italic: font(BuiltinFont::HelveticaOblique)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

/// Replace characters outside the built-in fonts' WinAnsi repertoire
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            ' '..='~' | '\u{A0}'..='\u{FF}' => c,
            '€' | '…' | '‘' | '’' | '“' | '”' | '•' | '–' | '—' => c,
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap to at most `max_chars` characters per line. Words
/// longer than a line are hard-broken.
fn wrap_line(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let word_len = word.chars().count();
        let needed = if current_len == 0 {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if needed <= max_chars {
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        for c in word.chars() {
            if current_len == max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(c);
            current_len += 1;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Top-down cursor layout over the pages of one document
struct PageLayout {
    doc: PdfDocumentReference,
    fonts: Fonts,
    layer: PdfLayerReference,
    pages: usize,
    cursor: f32,
    style: FontStyle,
    size: f32,
}

impl PageLayout {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        let fonts = Fonts::load(&doc)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            fonts,
            layer,
            pages: 1,
            cursor: PAGE_HEIGHT - MARGIN,
            style: FontStyle::Regular,
            size: 12.0,
        })
    }

    fn add_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn set_font(&mut self, style: FontStyle, size: f32) {
        self.style = style;
        self.size = size;
    }

    fn gap(&mut self, height: f32) {
        self.cursor -= height;
    }

    /// One line of text in a cell `height` millimetres tall
    fn line(&mut self, height: f32, text: &str) {
        self.place(height, &sanitize(text));
    }

    /// Text wrapped to the printable width, one cell per wrapped line
    fn paragraph(&mut self, height: f32, text: &str) {
        let glyph = self.size * PT_TO_MM * AVERAGE_GLYPH_EM;
        let max_chars = ((PAGE_WIDTH - 2.0 * MARGIN - 2.0 * CELL_PADDING) / glyph) as usize;
        for line in wrap_line(&sanitize(text), max_chars) {
            self.place(height, &line);
        }
    }

    fn place(&mut self, height: f32, text: &str) {
        if self.cursor - height < BOTTOM_MARGIN {
            self.add_page();
        }
        if !text.is_empty() {
            let baseline = self.cursor - 0.5 * height - 0.3 * self.size * PT_TO_MM;
            self.layer.use_text(
                text,
                self.size,
                Mm(MARGIN + CELL_PADDING),
                Mm(baseline),
                self.fonts.get(self.style),
            );
        }
        self.cursor -= height;
    }

    fn finish(self) -> Result<Vec<u8>> {
        debug!("Rendering PDF report with {} page(s)", self.pages);
        self.doc
            .save_to_bytes()
            .map_err(|e| Error::Render(format!("could not write PDF: {e}")))
    }
}

#[derive(Debug, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }

    fn layout(&self, request: &ReportRequest<'_>) -> Result<PageLayout> {
        let mut page = PageLayout::new(REPORT_TITLE)?;

        page.set_font(FontStyle::Bold, 18.0);
        page.line(10.0, REPORT_TITLE);
        page.set_font(FontStyle::Regular, 12.0);
        page.line(8.0, &format!("Date: {}", request.display_date()));
        if !request.identity.is_empty() {
            page.line(8.0, &format!("Email: {}", request.identity));
        }
        page.gap(6.0);

        page.set_font(FontStyle::Bold, 14.0);
        page.line(8.0, SNAPSHOT_HEADING);
        page.set_font(FontStyle::Regular, 12.0);
        for (theme, score) in request.scores.iter() {
            page.line(7.0, &format!("- {theme}: {score}"));
        }
        page.gap(4.0);

        page.set_font(FontStyle::Bold, 14.0);
        page.line(8.0, TOP_THEMES_HEADING);
        page.set_font(FontStyle::Regular, 12.0);
        page.paragraph(6.0, &request.top_themes.join(", "));
        page.gap(2.0);

        page.set_font(FontStyle::Bold, 14.0);
        page.line(8.0, GUIDANCE_HEADING);
        page.set_font(FontStyle::Regular, 12.0);
        for line in request.narrative.split('\n') {
            page.paragraph(6.0, line.trim_end_matches('\r'));
        }

        page.gap(6.0);
        page.set_font(FontStyle::Italic, 10.0);
        page.paragraph(6.0, FOOTER);

        Ok(page)
    }
}

impl ReportRenderer for PdfRenderer {
    fn render(&self, request: &ReportRequest<'_>) -> Result<Vec<u8>> {
        self.layout(request)?.finish()
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoreMap;
    use chrono::NaiveDate;
    use lopdf::content::Content;
    use lopdf::{Document, Object};

    /// Text shown on each page, one entry per text-showing operation
    fn page_texts(pdf: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.get_pages()
            .values()
            .map(|&id| {
                let content = Content::decode(&doc.get_page_content(id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj" || op.operator == "TJ")
                    .flat_map(|op| op.operands.iter())
                    .filter_map(|operand| match operand {
                        Object::String(bytes, _) => {
                            Some(bytes.iter().map(|&b| char::from(b)).collect())
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    fn scores() -> ScoreMap {
        let mut scores = ScoreMap::zeroed(["Identity", "Growth"]);
        scores.add("Growth", 5);
        scores
    }

    fn render(narrative: &str) -> Vec<u8> {
        let scores = scores();
        let top = vec!["Growth".to_string()];
        let request = ReportRequest {
            identity: "you@example.com",
            date: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
            scores: &scores,
            top_themes: &top,
            narrative,
        };
        PdfRenderer::new().render(&request).unwrap()
    }

    #[test]
    fn test_document_lists_sections_in_order() {
        let pdf = render("Keep going.");
        assert!(pdf.starts_with(b"%PDF-"));

        let pages = page_texts(&pdf);
        assert_eq!(pages.len(), 1);
        let expected = [
            REPORT_TITLE,
            "Date: 07 Mar 2026",
            "Email: you@example.com",
            SNAPSHOT_HEADING,
            "- Identity: 0",
            "- Growth: 5",
            TOP_THEMES_HEADING,
            "Growth",
            GUIDANCE_HEADING,
            "Keep going.",
        ];
        assert_eq!(&pages[0][..expected.len()], &expected);
    }

    #[test]
    fn test_long_narrative_wraps_and_breaks_pages() {
        let long_line = "practice ".repeat(60);
        let narrative = vec![long_line.as_str(); 40].join("\n");
        let pages = page_texts(&render(&narrative));

        assert!(pages.len() > 1);
        let wrapped: Vec<_> = pages
            .iter()
            .flatten()
            .filter(|t| t.starts_with("practice practice"))
            .collect();
        assert!(wrapped.len() > 40);
        assert!(wrapped.iter().all(|t| t.chars().count() <= 90));
    }

    #[test]
    fn test_sanitize_replaces_unsupported_characters() {
        assert_eq!(sanitize("a•b—c"), "a•b—c");
        assert_eq!(sanitize("café\tbar"), "café bar");
        assert_eq!(sanitize("✨ shine"), "? shine");
    }

    #[test]
    fn test_wrap_respects_limit() {
        let text = "balance ".repeat(40);
        let lines = wrap_line(&text, 30);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.len() <= 30);
            assert!(!line.starts_with(' '));
        }
    }

    #[test]
    fn test_wrap_hard_breaks_long_words() {
        let word = "W".repeat(100);
        let lines = wrap_line(&word, 40);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().map(String::len).sum::<usize>(), 100);
    }

    #[test]
    fn test_wrap_empty_line_keeps_one_row() {
        assert_eq!(wrap_line("", 40), vec![String::new()]);
    }
}
