//! Rendering module for converting documents to various output formats.

mod html;
mod json;
mod markdown;
mod options;
mod result;
mod text;

pub use html::{to_html, to_html_with_stats, HtmlRenderer};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::{PageSelection, RenderOptions, TableFallback, DEFAULT_TABLE_ATTRIBUTES};
pub use result::{ExtractionStats, RenderResult};
pub use text::to_text;
