//! Markdown rendering of reconstructed documents.

use crate::error::Result;
use crate::model::{Block, Document, InlineContent, Line, Page, Paragraph, Table};

use super::html::HtmlRenderer;
use super::{ExtractionStats, RenderOptions, RenderResult, TableFallback};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = MarkdownRenderer::new(options);
    renderer.render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(self, doc: &Document) -> Result<String> {
        Ok(self.render_internal(doc))
    }

    /// Render a document to Markdown with extraction statistics.
    pub fn render_with_stats(self, doc: &Document) -> Result<RenderResult> {
        let content = self.render_internal(doc);

        let mut stats = ExtractionStats::from_document(doc, &self.options.page_selection);
        stats.count_text(&content);

        Ok(RenderResult::new(content, doc.metadata.clone(), stats))
    }

    fn render_internal(&self, doc: &Document) -> String {
        let mut output = String::new();

        // Add frontmatter if requested
        if self.options.include_frontmatter {
            output.push_str(&doc.metadata.to_yaml_frontmatter());
        }

        for page in &doc.pages {
            if self.options.page_selection.includes(page.number) {
                self.render_page(&mut output, page);
            }
        }

        output.trim().to_string()
    }

    fn render_page(&self, output: &mut String, page: &Page) {
        for block in &page.blocks {
            match block {
                Block::Paragraph(p) => self.render_paragraph(output, p),
                Block::Table(t) => self.render_table(output, t),
            }
        }
    }

    /// Every visual line becomes its own Markdown paragraph.
    fn render_paragraph(&self, output: &mut String, para: &Paragraph) {
        for line in &para.lines {
            if line.is_empty() {
                continue;
            }
            output.push_str(&self.inline_text(line));
            output.push_str("\n\n");
        }
    }

    fn inline_text(&self, line: &Line) -> String {
        line.content
            .iter()
            .map(|item| match item {
                InlineContent::Text(run) => {
                    if self.options.escape_special_chars {
                        escape_markdown(&run.text)
                    } else {
                        run.text.clone()
                    }
                }
                InlineContent::Checkbox { state } => state.marker().to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render_table(&self, output: &mut String, table: &Table) {
        if table.is_empty() {
            return;
        }

        // Use HTML for complex tables
        if table.has_merged_cells() && self.options.table_fallback == TableFallback::Html {
            HtmlRenderer::new(self.options.clone()).render_table(output, table);
            output.push('\n');
            return;
        }

        self.render_table_markdown(output, table);
    }

    fn render_table_markdown(&self, output: &mut String, table: &Table) {
        let col_count = table.column_count();
        if col_count == 0 {
            return;
        }

        for (i, row) in table.rows.iter().enumerate() {
            output.push('|');
            for cell in &row.cells {
                let content = cell
                    .lines
                    .iter()
                    .map(|l| self.inline_text(l))
                    .collect::<Vec<_>>()
                    .join(" ");
                output.push_str(&format!(" {} |", content.trim()));
            }
            output.push('\n');

            // Separator after the first row
            if i == 0 {
                output.push('|');
                output.push_str(&" --- |".repeat(col_count));
                output.push('\n');
            }
        }

        output.push('\n');
    }
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            // Core formatting that must be escaped
            '\\' | '`' | '*' | '_' |
            // Brackets for links and checkboxes, pipe for tables
            '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
