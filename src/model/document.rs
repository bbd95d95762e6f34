//! Document-level types.

use super::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reconstructed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Analysis metadata
    pub metadata: Metadata,

    /// Pages in ascending page-number order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by its page number.
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == page_num)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any content.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.is_empty())
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Analysis metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Operation status reported by the analysis
    pub status: String,

    /// Service API version
    pub api_version: Option<String>,

    /// Model used for the analysis
    pub model_id: Option<String>,

    /// When the analysis was submitted
    pub created: Option<DateTime<Utc>>,

    /// When the analysis last changed state
    pub modified: Option<DateTime<Utc>>,

    /// Number of pages in the analysis
    pub page_count: u32,

    /// Length of the flat recognized text, in characters
    pub content_length: usize,
}

impl Metadata {
    /// Create new metadata with a status.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Default::default()
        }
    }

    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        lines.push(format!("status: \"{}\"", escape_yaml(&self.status)));
        if let Some(ref api_version) = self.api_version {
            lines.push(format!("api_version: \"{}\"", escape_yaml(api_version)));
        }
        if let Some(ref model_id) = self.model_id {
            lines.push(format!("model_id: \"{}\"", escape_yaml(model_id)));
        }
        if let Some(ref created) = self.created {
            lines.push(format!("created: {}", created.to_rfc3339()));
        }
        if let Some(ref modified) = self.modified {
            lines.push(format!("modified: {}", modified.to_rfc3339()));
        }
        lines.push(format!("pages: {}", self.page_count));

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Paragraph;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_get_page_by_number() {
        let mut doc = Document::new();
        doc.add_page(Page::new(2));
        doc.add_page(Page::new(5));

        assert_eq!(doc.get_page(5).map(|p| p.number), Some(5));
        assert!(doc.get_page(1).is_none());
        assert!(doc.is_empty());

        doc.pages[0].add_paragraph(Paragraph::with_text("x"));
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_metadata_frontmatter() {
        let mut metadata = Metadata::with_status("succeeded");
        metadata.model_id = Some("prebuilt-layout".to_string());
        metadata.api_version = Some("2023-07-31".to_string());
        metadata.page_count = 3;

        let yaml = metadata.to_yaml_frontmatter();
        assert!(yaml.starts_with("---\n"));
        assert!(yaml.contains("status: \"succeeded\""));
        assert!(yaml.contains("model_id: \"prebuilt-layout\""));
        assert!(yaml.contains("api_version: \"2023-07-31\""));
        assert!(yaml.contains("pages: 3"));
    }

    #[test]
    fn test_escape_yaml() {
        assert_eq!(escape_yaml("a \"b\"\nc"), "a \\\"b\\\"\\nc");
    }
}
