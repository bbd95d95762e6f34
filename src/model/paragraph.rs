//! Paragraph, line and inline-level types.

use serde::{Deserialize, Serialize};

/// A reconstructed paragraph group: one or more visual lines.
///
/// A group with a single line renders as bare inline content; a group with
/// several lines renders each line as its own paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Lines in top-to-bottom order
    pub lines: Vec<Line>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Create a paragraph from ordered lines.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Create a single-line paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut line = Line::new(0.0);
        line.add_text(text);
        Self::from_lines(vec![line])
    }

    /// Add a line.
    pub fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Whether the group resolved to exactly one visual line.
    pub fn is_single_line(&self) -> bool {
        self.lines.len() == 1
    }

    /// Get plain text content, one line per row.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the paragraph has no content.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    /// Number of words across all lines.
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.word_count()).sum()
    }

    /// Number of checkboxes across all lines.
    pub fn checkbox_count(&self) -> usize {
        self.lines.iter().map(|l| l.checkbox_count()).sum()
    }
}

/// One visual line of inline content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Vertical position of the line (midpoint of the element that opened it)
    pub center_y: f64,

    /// Text runs and checkboxes, left to right
    pub content: Vec<InlineContent>,
}

impl Line {
    /// Create an empty line at the given vertical position.
    pub fn new(center_y: f64) -> Self {
        Self {
            center_y,
            content: Vec::new(),
        }
    }

    /// Add plain text.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.content.push(InlineContent::Text(TextRun::new(text)));
    }

    /// Add a checkbox.
    pub fn add_checkbox(&mut self, state: SelectionState) {
        self.content.push(InlineContent::Checkbox { state });
    }

    /// Get plain text, checkboxes shown as `[x]` / `[ ]`.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.clone(),
                InlineContent::Checkbox { state } => state.marker().to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the line has no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of words in the line's text runs.
    pub fn word_count(&self) -> usize {
        self.content
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.split_whitespace().count(),
                InlineContent::Checkbox { .. } => 0,
            })
            .sum()
    }

    /// Number of checkboxes in the line.
    pub fn checkbox_count(&self) -> usize {
        self.content
            .iter()
            .filter(|c| matches!(c, InlineContent::Checkbox { .. }))
            .count()
    }
}

/// Inline content within a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineContent {
    /// Consecutive words joined by single spaces
    Text(TextRun),

    /// A checkbox widget; breaks the surrounding text into separate runs
    Checkbox {
        /// Checked or not
        state: SelectionState,
    },
}

/// A run of words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,
}

impl TextRun {
    /// Create a new text run.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// State of a selection mark / checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    /// The mark is checked
    Selected,
    /// The mark is empty
    Unselected,
}

impl SelectionState {
    /// Wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionState::Selected => "selected",
            SelectionState::Unselected => "unselected",
        }
    }

    /// Whether the checkbox is checked.
    pub fn is_selected(&self) -> bool {
        matches!(self, SelectionState::Selected)
    }

    /// Text marker used by plain-text and Markdown output.
    pub fn marker(&self) -> &'static str {
        if self.is_selected() {
            "[x]"
        } else {
            "[ ]"
        }
    }
}
