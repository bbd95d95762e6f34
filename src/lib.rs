//! # ocrlayout
//!
//! Reading-order and structure reconstruction for layout OCR results.
//!
//! A layout analysis reports words, selection marks, paragraphs and tables
//! as separate flat lists with polygons and text offsets. This library
//! reassembles them into an ordered document: paragraph groups made of
//! visual lines, checkboxes placed inline at their position, and tables
//! emitted once where they first appear.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ocrlayout::{parse_file, render};
//!
//! fn main() -> ocrlayout::Result<()> {
//!     // Reconstruct the layout of an analysis result
//!     let doc = parse_file("analysis.json")?;
//!
//!     // Convert to HTML
//!     let options = render::RenderOptions::default();
//!     let html = render::to_html(&doc, &options)?;
//!     println!("{}", html);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Line reconstruction**: Words and checkboxes grouped into visual lines
//! - **Table placement**: Tables deduplicated and kept in reading order
//! - **Multiple output formats**: HTML, Markdown, plain text, JSON
//! - **Parallel processing**: Uses Rayon for independent units of a page

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_status_from_bytes, detect_status_from_path, AnalysisStatus};
pub use error::{Error, Result};
pub use model::{
    Block, CellKind, Document, InlineContent, Line, Metadata, Page, Paragraph, SelectionState,
    Table, TableCell, TableRow, TextRun,
};
pub use parser::{AnalysisParser, ElementWeights, ErrorMode, LayoutOptions};
pub use render::{JsonFormat, PageSelection, RenderOptions, TableFallback};

use std::io::Read;
use std::path::Path;

/// Reconstruct the layout of an analysis result given as a JSON string.
///
/// A result whose status is not `succeeded` yields an empty document.
///
/// # Example
///
/// ```
/// let doc = ocrlayout::parse_str(r#"{"status": "failed"}"#).unwrap();
/// assert!(doc.is_empty());
/// ```
pub fn parse_str(json: &str) -> Result<Document> {
    let parser = AnalysisParser::from_json(json)?;
    parser.parse()
}

/// Reconstruct the layout of a JSON string with custom options.
pub fn parse_str_with_options(json: &str, options: LayoutOptions) -> Result<Document> {
    let parser = AnalysisParser::from_json_with_options(json, options)?;
    parser.parse()
}

/// Reconstruct the layout of an analysis result file.
///
/// # Arguments
///
/// * `path` - Path to the analysis JSON file
///
/// # Example
///
/// ```no_run
/// use ocrlayout::parse_file;
///
/// let doc = parse_file("analysis.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = AnalysisParser::open(path)?;
    parser.parse()
}

/// Reconstruct the layout of a file with custom options.
///
/// # Example
///
/// ```no_run
/// use ocrlayout::{parse_file_with_options, LayoutOptions};
///
/// let options = LayoutOptions::new()
///     .lenient()
///     .sequential();
/// let doc = parse_file_with_options("analysis.json", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: LayoutOptions,
) -> Result<Document> {
    let parser = AnalysisParser::open_with_options(path, options)?;
    parser.parse()
}

/// Reconstruct the layout of UTF-8 JSON bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = AnalysisParser::from_bytes(data)?;
    parser.parse()
}

/// Reconstruct the layout of UTF-8 JSON bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: LayoutOptions) -> Result<Document> {
    let parser = AnalysisParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Reconstruct the layout read from a reader.
///
/// # Example
///
/// ```no_run
/// use ocrlayout::parse_reader;
/// use std::fs::File;
///
/// let file = File::open("analysis.json").unwrap();
/// let doc = parse_reader(file).unwrap();
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    let parser = AnalysisParser::from_reader(reader)?;
    parser.parse()
}

/// Reconstruct the layout read from a reader with custom options.
pub fn parse_reader_with_options<R: Read>(reader: R, options: LayoutOptions) -> Result<Document> {
    let parser = AnalysisParser::from_reader_with_options(reader, options)?;
    parser.parse()
}

/// Reconstruct the layout of a file, reading it asynchronously.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(
    path: P,
    options: LayoutOptions,
) -> Result<Document> {
    let data = tokio::fs::read(path.as_ref()).await?;
    parse_bytes_with_options(&data, options)
}

/// Convert an analysis result file to HTML.
///
/// # Example
///
/// ```no_run
/// let html = ocrlayout::to_html("analysis.json").unwrap();
/// std::fs::write("output.html", html).unwrap();
/// ```
pub fn to_html<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_html(&doc, &RenderOptions::default())
}

/// Convert an analysis result file to HTML with custom render options.
pub fn to_html_with_options<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_html(&doc, options)
}

/// Convert an analysis result file to Markdown.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Convert an analysis result file to Markdown with custom options.
///
/// # Example
///
/// ```no_run
/// use ocrlayout::{to_markdown_with_options, RenderOptions, TableFallback};
///
/// let options = RenderOptions::new()
///     .with_frontmatter(true)
///     .with_table_fallback(TableFallback::Html);
/// let markdown = to_markdown_with_options("analysis.json", &options).unwrap();
/// ```
pub fn to_markdown_with_options<P: AsRef<Path>>(
    path: P,
    options: &RenderOptions,
) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, options)
}

/// Convert an analysis result file to plain text.
pub fn to_text<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc, options)
}

/// Convert an analysis result file to the JSON document model.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Parse a page selection string such as `"1-3,5"`.
pub fn parse_pages(spec: &str) -> Result<PageSelection> {
    PageSelection::parse(spec).map_err(Error::InvalidPageRange)
}

/// Builder for reconstructing and rendering analysis results.
///
/// # Example
///
/// ```no_run
/// use ocrlayout::OcrLayout;
///
/// let html = OcrLayout::new()
///     .lenient()
///     .with_line_threshold(0.6)
///     .parse("analysis.json")?
///     .to_html()?;
/// # Ok::<(), ocrlayout::Error>(())
/// ```
pub struct OcrLayout {
    layout_options: LayoutOptions,
    render_options: RenderOptions,
}

impl OcrLayout {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            layout_options: LayoutOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Enable lenient mode: malformed entities are skipped.
    pub fn lenient(mut self) -> Self {
        self.layout_options = self.layout_options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.layout_options = self.layout_options.sequential();
        self
    }

    /// Set the region containment threshold.
    pub fn with_region_threshold(mut self, threshold: f64) -> Self {
        self.layout_options = self.layout_options.with_region_threshold(threshold);
        self
    }

    /// Set the line grouping threshold.
    pub fn with_line_threshold(mut self, threshold: f64) -> Self {
        self.layout_options = self.layout_options.with_line_threshold(threshold);
        self
    }

    /// Append tables no paragraph refers to at the end of their page.
    pub fn with_orphan_tables(mut self) -> Self {
        self.layout_options = self.layout_options.with_orphan_tables(true);
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Set table fallback mode.
    pub fn with_table_fallback(mut self, fallback: TableFallback) -> Self {
        self.render_options = self.render_options.with_table_fallback(fallback);
        self
    }

    /// Set the attributes of rendered `<table>` elements.
    pub fn with_table_attributes(mut self, attributes: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_table_attributes(attributes);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.layout_options = self.layout_options.with_pages(pages.clone());
        self.render_options = self.render_options.with_pages(pages);
        self
    }

    /// Reconstruct an analysis result file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<LayoutResult> {
        let parser = AnalysisParser::open_with_options(path, self.layout_options)?;
        let document = parser.parse()?;
        Ok(LayoutResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Reconstruct an analysis result given as a JSON string.
    pub fn parse_str(self, json: &str) -> Result<LayoutResult> {
        let parser = AnalysisParser::from_json_with_options(json, self.layout_options)?;
        let document = parser.parse()?;
        Ok(LayoutResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for OcrLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a reconstruction, ready for rendering.
pub struct LayoutResult {
    /// The reconstructed document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl LayoutResult {
    /// Convert to HTML.
    pub fn to_html(&self) -> Result<String> {
        render::to_html(&self.document, &self.render_options)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
