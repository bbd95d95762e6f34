//! Plain text rendering of reconstructed documents.

use crate::error::Result;
use crate::model::Document;

use super::RenderOptions;

/// Convert a document to plain text.
///
/// Lines are separated by newlines, blocks and pages by a blank line, and
/// table cells by tabs. Checkboxes appear as `[x]` or `[ ]`.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let output = doc
        .pages
        .iter()
        .filter(|page| options.page_selection.includes(page.number))
        .map(|page| page.plain_text())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(output.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Page, Paragraph, SelectionState};

    fn sample_document() -> Document {
        let mut doc = Document::new();
        let mut page = Page::new(1);
        page.add_paragraph(Paragraph::with_text("Hello, world!"));
        let mut line = Line::new(0.0);
        line.add_checkbox(SelectionState::Unselected);
        line.add_text("Subscribe");
        page.add_paragraph(Paragraph::from_lines(vec![line]));
        doc.add_page(page);

        let mut second = Page::new(2);
        second.add_paragraph(Paragraph::with_text("Second page."));
        doc.add_page(second);
        doc
    }

    #[test]
    fn test_to_text() {
        let result = to_text(&sample_document(), &RenderOptions::default()).unwrap();
        assert_eq!(result, "Hello, world!\n\n[ ] Subscribe\n\nSecond page.");
    }

    #[test]
    fn test_to_text_page_selection() {
        let options = RenderOptions::new().with_page_range(2..=2);
        let result = to_text(&sample_document(), &options).unwrap();
        assert_eq!(result, "Second page.");
    }
}
