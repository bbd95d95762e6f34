//! Rendering result with metadata and statistics.

use crate::model::{Block, Document, Line, Metadata, Paragraph, Table};
use serde::{Deserialize, Serialize};

use super::PageSelection;

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (HTML, Markdown, text)
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, metadata: Metadata, stats: ExtractionStats) -> Self {
        Self {
            content,
            metadata,
            stats,
        }
    }

    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            metadata: Metadata::default(),
            stats: ExtractionStats::default(),
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected during layout reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total number of pages processed
    pub page_count: u32,

    /// Number of paragraph groups
    pub paragraph_count: u32,

    /// Number of visual lines, in paragraphs and table cells
    pub line_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of table cells
    pub cell_count: u32,

    /// Number of words placed
    pub word_count: u32,

    /// Number of checkboxes placed
    pub checkbox_count: u32,

    /// Character count of the rendered content (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics over the selected pages of a document.
    pub fn from_document(doc: &Document, selection: &PageSelection) -> Self {
        let mut stats = Self::new();
        for page in doc.pages.iter().filter(|p| selection.includes(p.number)) {
            stats.add_page();
            for block in &page.blocks {
                match block {
                    Block::Paragraph(p) => stats.add_paragraph(p),
                    Block::Table(t) => stats.add_table(t),
                }
            }
        }
        stats
    }

    /// Increment page count.
    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Count a paragraph group and its lines.
    pub fn add_paragraph(&mut self, paragraph: &Paragraph) {
        self.paragraph_count += 1;
        self.add_lines(&paragraph.lines);
    }

    /// Count a table, its cells and their lines.
    pub fn add_table(&mut self, table: &Table) {
        self.table_count += 1;
        for cell in table.cells() {
            self.cell_count += 1;
            self.add_lines(&cell.lines);
        }
    }

    fn add_lines(&mut self, lines: &[Line]) {
        for line in lines {
            self.line_count += 1;
            self.word_count += line.word_count() as u32;
            self.checkbox_count += line.checkbox_count() as u32;
        }
    }

    /// Add character counts from rendered text.
    pub fn count_text(&mut self, text: &str) {
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.page_count += other.page_count;
        self.paragraph_count += other.paragraph_count;
        self.line_count += other.line_count;
        self.table_count += other.table_count;
        self.cell_count += other.cell_count;
        self.word_count += other.word_count;
        self.checkbox_count += other.checkbox_count;
        self.char_count += other.char_count;
    }
}
