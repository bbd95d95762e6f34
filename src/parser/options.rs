//! Layout options and configuration.

use super::extract::ElementWeights;
use super::geometry::{DEFAULT_LINE_THRESHOLD, DEFAULT_REGION_THRESHOLD};
use crate::render::PageSelection;

/// Options for reconstructing the layout of an analysis result.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Fraction of a mark that must lie inside a paragraph group's word
    /// region for the mark to join the group
    pub region_threshold: f64,

    /// Fraction of vertical overlap needed for two elements to share a line
    pub line_threshold: f64,

    /// Tie-break weights for elements at identical x positions
    pub weights: ElementWeights,

    /// Whether to use parallel processing
    pub parallel: bool,

    /// Page selection (which pages to reconstruct)
    pub pages: PageSelection,

    /// Append tables that no paragraph refers to at the end of their page
    pub include_orphan_tables: bool,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip entities with missing fields).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the region containment threshold.
    pub fn with_region_threshold(mut self, threshold: f64) -> Self {
        self.region_threshold = threshold;
        self
    }

    /// Set the line membership threshold.
    pub fn with_line_threshold(mut self, threshold: f64) -> Self {
        self.line_threshold = threshold;
        self
    }

    /// Set element weights.
    pub fn with_weights(mut self, weights: ElementWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable output of tables no paragraph points at.
    pub fn with_orphan_tables(mut self, include: bool) -> Self {
        self.include_orphan_tables = include;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            region_threshold: DEFAULT_REGION_THRESHOLD,
            line_threshold: DEFAULT_LINE_THRESHOLD,
            weights: ElementWeights::default(),
            parallel: true,
            pages: PageSelection::All,
            include_orphan_tables: false,
        }
    }
}

/// Error handling mode during reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any missing field
    #[default]
    Strict,
    /// Skip entities with missing fields and continue
    Lenient,
}
