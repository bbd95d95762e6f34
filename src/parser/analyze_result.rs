//! Serde model of a layout analysis result.
//!
//! Only the fields the layout pass reads are modelled. Unknown fields are
//! ignored, and list fields that may be absent default to empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::Polygon;
pub use crate::model::{CellKind, SelectionState};

/// Status value that marks a finished, usable analysis.
pub const STATUS_SUCCEEDED: &str = "succeeded";

/// Top-level response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Operation status ("succeeded", "running", "failed", ...)
    pub status: String,

    /// When the analysis was submitted
    #[serde(default)]
    pub created_date_time: Option<DateTime<Utc>>,

    /// When the analysis last changed state
    #[serde(default)]
    pub last_updated_date_time: Option<DateTime<Utc>>,

    /// The analysis payload, present once the operation succeeded
    #[serde(default)]
    pub analyze_result: Option<AnalyzeResult>,
}

impl AnalyzeResponse {
    /// Whether the analysis finished successfully.
    pub fn is_succeeded(&self) -> bool {
        self.status == STATUS_SUCCEEDED
    }
}

/// Analysis payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    /// Service API version
    #[serde(default)]
    pub api_version: Option<String>,

    /// Model used for the analysis
    #[serde(default)]
    pub model_id: Option<String>,

    /// Flat recognized text that spans index into
    #[serde(default)]
    pub content: Option<String>,

    /// Analyzed pages
    pub pages: Vec<AnalyzedPage>,

    /// Top-level paragraphs in reading order
    pub paragraphs: Vec<AnalyzedParagraph>,

    /// Detected tables
    pub tables: Vec<AnalyzedTable>,
}

impl AnalyzeResult {
    /// Look up a page by its 1-indexed page number.
    pub fn page(&self, page_number: u32) -> Option<&AnalyzedPage> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }
}

/// A page with its words and selection marks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedPage {
    /// Page number (1-indexed)
    #[serde(default = "default_page_number")]
    pub page_number: u32,

    /// Page width in `unit`
    #[serde(default)]
    pub width: Option<f64>,

    /// Page height in `unit`
    #[serde(default)]
    pub height: Option<f64>,

    /// Measurement unit ("pixel", "inch")
    #[serde(default)]
    pub unit: Option<String>,

    /// Detected text angle in degrees
    #[serde(default)]
    pub angle: Option<f64>,

    /// Recognized words
    #[serde(default)]
    pub words: Vec<Word>,

    /// Detected selection marks
    #[serde(default)]
    pub selection_marks: Vec<SelectionMark>,
}

fn default_page_number() -> u32 {
    1
}

/// A half-open character range `[offset, offset + length)` into the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset
    pub offset: u64,
    /// Number of characters
    pub length: u64,
}

impl Span {
    /// Create a new span.
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// Exclusive end offset, or `None` if it does not fit in a `u64`.
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.length)
    }

    /// Whether `other` lies entirely within this span.
    ///
    /// A span whose end overflows contains nothing and is contained in
    /// nothing.
    pub fn contains(&self, other: &Span) -> bool {
        match (self.end(), other.end()) {
            (Some(end), Some(other_end)) => self.offset <= other.offset && other_end <= end,
            _ => false,
        }
    }
}

/// A recognized word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Word text
    pub content: String,
    /// Bounding polygon
    pub polygon: Polygon,
    /// Location in the content
    pub span: Span,
    /// Recognition confidence
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A checkbox-like mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionMark {
    /// Selected or not
    pub state: SelectionState,
    /// Bounding polygon
    pub polygon: Polygon,
    /// Location in the content
    pub span: Span,
    /// Detection confidence
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A region of a given page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRegion {
    /// Page the region is on (1-indexed)
    pub page_number: u32,
    /// Region outline
    pub polygon: Polygon,
}

/// A paragraph as reported by the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedParagraph {
    /// Paragraph text
    #[serde(default)]
    pub content: Option<String>,

    /// Semantic role ("title", "pageHeader", ...)
    #[serde(default)]
    pub role: Option<String>,

    /// Where the paragraph is
    #[serde(default)]
    pub bounding_regions: Vec<BoundingRegion>,

    /// Where its text is in the content
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl AnalyzedParagraph {
    /// The first bounding region, which locates the paragraph.
    pub fn region(&self) -> Option<&BoundingRegion> {
        self.bounding_regions.first()
    }
}

/// A table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedTable {
    /// Number of rows
    #[serde(default)]
    pub row_count: Option<u32>,

    /// Number of columns
    #[serde(default)]
    pub column_count: Option<u32>,

    /// Where the table is
    #[serde(default)]
    pub bounding_regions: Vec<BoundingRegion>,

    /// Cells in source order
    #[serde(default)]
    pub cells: Vec<AnalyzedCell>,
}

impl AnalyzedTable {
    /// The first bounding region, which locates the table.
    pub fn region(&self) -> Option<&BoundingRegion> {
        self.bounding_regions.first()
    }
}

/// A table cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedCell {
    /// Row index (0-indexed)
    pub row_index: u32,

    /// Column index (0-indexed)
    pub column_index: u32,

    /// Rows covered
    #[serde(default = "default_span_count")]
    pub row_span: u32,

    /// Columns covered
    #[serde(default = "default_span_count")]
    pub column_span: u32,

    /// Cell role
    #[serde(default)]
    pub kind: CellKind,

    /// Cell text
    #[serde(default)]
    pub content: Option<String>,

    /// Where the cell is
    #[serde(default)]
    pub bounding_regions: Vec<BoundingRegion>,

    /// Where its text is in the content
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl AnalyzedCell {
    /// The first bounding region, which locates the cell.
    pub fn region(&self) -> Option<&BoundingRegion> {
        self.bounding_regions.first()
    }
}

fn default_span_count() -> u32 {
    1
}
