//! Selection of the words and selection marks that belong to a paragraph
//! group or table cell, and their conversion into positioned elements.

use super::analyze_result::{SelectionMark, SelectionState, Span, Word};
use super::geometry::{overlaps_above, Point, Polygon, VerticalInterval};

/// Ordering weight of a word.
pub const WORD_WEIGHT: f64 = 1.0;

/// Ordering weight of a checkbox; heavier than a word so that a checkbox
/// sharing a word's exact x position is placed first.
pub const CHECKBOX_WEIGHT: f64 = 1.1;

/// Tie-break weights per element kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementWeights {
    /// Weight of words
    pub word: f64,
    /// Weight of checkboxes
    pub checkbox: f64,
}

impl Default for ElementWeights {
    fn default() -> Self {
        Self {
            word: WORD_WEIGHT,
            checkbox: CHECKBOX_WEIGHT,
        }
    }
}

/// What a positioned element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A recognized word
    Word,
    /// A checkbox with its state
    Checkbox(SelectionState),
}

/// The working unit of line reconstruction.
#[derive(Debug, Clone)]
pub struct PositionedElement {
    /// Word or checkbox
    pub kind: ElementKind,
    /// Word text, or the checkbox state name
    pub content: String,
    /// Horizontal ordering reference (diagonal midpoint)
    pub center: Point,
    /// Vertical extent used for line membership
    pub vertical_interval: VerticalInterval,
    /// Tie-break weight for identical x positions
    pub weight: f64,
    /// Source polygon
    pub polygon: Polygon,
}

impl PositionedElement {
    /// Build an element from a word.
    pub fn from_word(word: &Word, weight: f64) -> Self {
        Self {
            kind: ElementKind::Word,
            content: word.content.clone(),
            center: word.polygon.diagonal_midpoint(),
            vertical_interval: word.polygon.vertical_interval(),
            weight,
            polygon: word.polygon,
        }
    }

    /// Build an element from a selection mark.
    pub fn from_mark(mark: &SelectionMark, weight: f64) -> Self {
        Self {
            kind: ElementKind::Checkbox(mark.state),
            content: mark.state.as_str().to_string(),
            center: mark.polygon.diagonal_midpoint(),
            vertical_interval: mark.polygon.vertical_interval(),
            weight,
            polygon: mark.polygon,
        }
    }

    /// Whether the element is a word.
    pub fn is_word(&self) -> bool {
        self.kind == ElementKind::Word
    }
}

/// Words whose span lies within the entity's FIRST span.
///
/// Entities with several spans only contribute words from the first one.
pub fn words_in_span<'a>(spans: &[Span], words: &'a [Word]) -> Vec<&'a Word> {
    let Some(range) = spans.first() else {
        return Vec::new();
    };
    words.iter().filter(|w| range.contains(&w.span)).collect()
}

/// Whether a mark's span lies within any of the given spans.
pub fn mark_in_spans(spans: &[Span], mark: &SelectionMark) -> bool {
    spans.iter().any(|s| s.contains(&mark.span))
}

/// Whether a mark's polygon overlaps `region` above `threshold`.
pub fn mark_in_region(region: &Polygon, mark: &SelectionMark, threshold: f64) -> bool {
    overlaps_above(region, &mark.polygon, threshold)
}

/// Marks whose span lies within ANY of the entity's spans.
pub fn selections_in_spans<'a>(spans: &[Span], marks: &'a [SelectionMark]) -> Vec<&'a SelectionMark> {
    marks.iter().filter(|m| mark_in_spans(spans, m)).collect()
}

/// Marks whose polygon overlaps `region` above `threshold`.
pub fn selections_overlapping_region<'a>(
    region: &Polygon,
    marks: &'a [SelectionMark],
    threshold: f64,
) -> Vec<&'a SelectionMark> {
    marks
        .iter()
        .filter(|m| mark_in_region(region, m, threshold))
        .collect()
}

/// Convert selected words and marks into positioned elements, words first.
pub fn to_elements(
    words: &[&Word],
    marks: &[&SelectionMark],
    weights: ElementWeights,
) -> Vec<PositionedElement> {
    words
        .iter()
        .map(|w| PositionedElement::from_word(w, weights.word))
        .chain(
            marks
                .iter()
                .map(|m| PositionedElement::from_mark(m, weights.checkbox)),
        )
        .collect()
}

/// Tracks which selection marks of a page have been attributed, so that a
/// mark ends up in at most one cell or paragraph group.
#[derive(Debug)]
pub struct MarkClaims<'a> {
    marks: &'a [SelectionMark],
    claimed: Vec<bool>,
}

impl<'a> MarkClaims<'a> {
    /// Start with every mark unclaimed.
    pub fn new(marks: &'a [SelectionMark]) -> Self {
        Self {
            marks,
            claimed: vec![false; marks.len()],
        }
    }

    /// Claim every unclaimed mark whose span lies within any of `spans`.
    pub fn claim_in_spans(&mut self, spans: &[Span]) -> Vec<&'a SelectionMark> {
        self.claim_where(|m| mark_in_spans(spans, m))
    }

    /// Claim every unclaimed mark overlapping `region` above `threshold`.
    pub fn claim_in_region(&mut self, region: &Polygon, threshold: f64) -> Vec<&'a SelectionMark> {
        self.claim_where(|m| mark_in_region(region, m, threshold))
    }

    /// Number of marks not yet attributed.
    pub fn unclaimed_count(&self) -> usize {
        self.claimed.iter().filter(|c| !**c).count()
    }

    fn claim_where<F>(&mut self, mut predicate: F) -> Vec<&'a SelectionMark>
    where
        F: FnMut(&SelectionMark) -> bool,
    {
        let marks = self.marks;
        let mut selected = Vec::new();
        for (mark, claimed) in marks.iter().zip(self.claimed.iter_mut()) {
            if !*claimed && predicate(mark) {
                *claimed = true;
                selected.push(mark);
            }
        }
        selected
    }
}
