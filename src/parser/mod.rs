//! Analysis parsing and layout reconstruction.

pub mod analyze_result;
pub mod extract;
pub mod geometry;
pub mod layout;
mod ocr_parser;
mod options;
pub mod partition;

pub use analyze_result::{AnalyzeResponse, AnalyzeResult};
pub use extract::{ElementKind, ElementWeights, MarkClaims, PositionedElement};
pub use geometry::{
    intersection_area, overlaps_above, union_bounding_box, Point, Polygon, VerticalInterval,
    DEFAULT_LINE_THRESHOLD, DEFAULT_REGION_THRESHOLD,
};
pub use layout::{group_into_lines, merge_inline, order_lines, reconstruct_lines, LineCluster};
pub use ocr_parser::AnalysisParser;
pub use options::{ErrorMode, LayoutOptions};
pub use partition::{partition_page, PageItem};
