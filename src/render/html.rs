//! HTML rendering of reconstructed documents.
//!
//! A paragraph group that resolved to a single line is emitted as bare
//! inline content; a group with several lines gets one `<p>` per line. The
//! same rule applies inside table cells. Checkboxes become disabled
//! checkbox inputs.

use std::borrow::Cow;

use crate::error::Result;
use crate::model::{Block, Document, InlineContent, Line, Page, Table, TableCell};

use super::{ExtractionStats, RenderOptions, RenderResult};

/// Convert a document to HTML.
pub fn to_html(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = HtmlRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to HTML with statistics.
pub fn to_html_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = HtmlRenderer::new(options);
    renderer.render_with_stats(doc)
}

/// HTML renderer.
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to HTML.
    pub fn render(self, doc: &Document) -> Result<String> {
        Ok(self.render_internal(doc))
    }

    /// Render a document to HTML with extraction statistics.
    pub fn render_with_stats(self, doc: &Document) -> Result<RenderResult> {
        let content = self.render_internal(doc);

        let mut stats = ExtractionStats::from_document(doc, &self.options.page_selection);
        stats.count_text(&content);

        Ok(RenderResult::new(content, doc.metadata.clone(), stats))
    }

    fn render_internal(&self, doc: &Document) -> String {
        let mut output = String::new();

        for page in &doc.pages {
            if self.options.page_selection.includes(page.number) {
                self.render_page(&mut output, page);
            }
        }

        output.trim_end().to_string()
    }

    fn render_page(&self, output: &mut String, page: &Page) {
        for block in &page.blocks {
            match block {
                Block::Paragraph(p) => self.render_lines(output, &p.lines),
                Block::Table(t) => self.render_table(output, t),
            }
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
        }
    }

    /// Render the lines of a paragraph group or cell.
    fn render_lines(&self, output: &mut String, lines: &[Line]) {
        if let [line] = lines {
            self.render_inline(output, &line.content);
            return;
        }
        for line in lines {
            output.push_str("<p>");
            self.render_inline(output, &line.content);
            output.push_str("</p>");
        }
    }

    fn render_inline(&self, output: &mut String, content: &[InlineContent]) {
        for (i, item) in content.iter().enumerate() {
            if i > 0 {
                output.push(' ');
            }
            match item {
                InlineContent::Text(run) => output.push_str(&self.escape(&run.text)),
                InlineContent::Checkbox { state } => {
                    if state.is_selected() {
                        output.push_str(r#"<input type="checkbox" checked disabled>"#);
                    } else {
                        output.push_str(r#"<input type="checkbox" disabled>"#);
                    }
                }
            }
        }
    }

    /// Render a table with header and data cells carrying their spans.
    pub(crate) fn render_table(&self, output: &mut String, table: &Table) {
        match self.options.table_attributes {
            Some(ref attributes) => {
                output.push_str("<table ");
                output.push_str(attributes);
                output.push('>');
            }
            None => output.push_str("<table>"),
        }
        output.push_str("<tbody>\n");

        for row in &table.rows {
            output.push_str("<tr>");
            for cell in &row.cells {
                self.render_cell(output, cell);
            }
            output.push_str("</tr>\n");
        }

        output.push_str("</tbody></table>\n");
    }

    fn render_cell(&self, output: &mut String, cell: &TableCell) {
        let tag = if cell.is_header() { "th" } else { "td" };
        output.push_str(&format!(
            "<{} rowspan=\"{}\" colspan=\"{}\">",
            tag, cell.row_span, cell.column_span
        ));
        self.render_lines(output, &cell.lines);
        output.push_str(&format!("</{}>", tag));
    }

    fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.options.escape_special_chars {
            html_escape::encode_text(text)
        } else {
            Cow::Borrowed(text)
        }
    }
}
