//! Line reconstruction for paragraph groups and table cells.
//!
//! Elements are clustered into visual lines by vertical overlap, lines are
//! ordered top to bottom, elements within a line left to right, and finally
//! consecutive words are merged into text runs broken by checkboxes.

use std::cmp::Ordering;

use super::extract::{ElementKind, PositionedElement};
use crate::model::{InlineContent, Line, TextRun};

/// A cluster of elements judged to share one visual row.
#[derive(Debug, Clone)]
pub struct LineCluster {
    /// Vertical midpoint of the element that opened the cluster
    pub key: f64,
    /// Elements in insertion order
    pub elements: Vec<PositionedElement>,
}

impl LineCluster {
    fn open(element: PositionedElement) -> Self {
        Self {
            key: element.vertical_interval.midpoint(),
            elements: vec![element],
        }
    }

    /// The most recently appended element.
    pub fn last(&self) -> Option<&PositionedElement> {
        self.elements.last()
    }

    /// Number of elements in the cluster.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the cluster is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Group elements into line clusters.
///
/// Each element, in input order, is compared against the LAST element of
/// every existing cluster in creation order. The first cluster whose last
/// element overlaps it vertically above `threshold` receives it; otherwise a
/// new cluster is opened. Clusters are never merged or re-evaluated, so the
/// result depends on input order.
pub fn group_into_lines(elements: Vec<PositionedElement>, threshold: f64) -> Vec<LineCluster> {
    let mut clusters: Vec<LineCluster> = Vec::new();

    for element in elements {
        let target = clusters.iter().position(|c| {
            c.last().is_some_and(|last| {
                last.vertical_interval
                    .overlaps_above(&element.vertical_interval, threshold)
            })
        });

        match target {
            Some(index) => clusters[index].elements.push(element),
            None => clusters.push(LineCluster::open(element)),
        }
    }

    clusters
}

/// Sort clusters top to bottom and each cluster's elements left to right.
///
/// Both sorts are stable: clusters with equal keys keep creation order.
pub fn order_lines(mut clusters: Vec<LineCluster>) -> Vec<LineCluster> {
    clusters.sort_by(|a, b| compare_coordinate(a.key, b.key));
    for cluster in &mut clusters {
        sort_line(&mut cluster.elements);
    }
    clusters
}

/// Sort the elements of one line by ascending x; at identical x the heavier
/// element comes first.
pub fn sort_line(elements: &mut [PositionedElement]) {
    elements.sort_by(|a, b| {
        compare_coordinate(a.center.x, b.center.x).then_with(|| b.weight.total_cmp(&a.weight))
    });
}

/// Total order on coordinates that treats `-0.0` and `0.0` as equal.
fn compare_coordinate(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

/// Merge ordered elements into inline content.
///
/// Consecutive words form one text run joined by single spaces; every
/// checkbox closes the current run and stands on its own.
pub fn merge_inline(elements: &[PositionedElement]) -> Vec<InlineContent> {
    let mut content = Vec::new();
    let mut words: Vec<&str> = Vec::new();

    for element in elements {
        match element.kind {
            ElementKind::Word => words.push(&element.content),
            ElementKind::Checkbox(state) => {
                flush_words(&mut words, &mut content);
                content.push(InlineContent::Checkbox { state });
            }
        }
    }
    flush_words(&mut words, &mut content);

    content
}

fn flush_words(words: &mut Vec<&str>, content: &mut Vec<InlineContent>) {
    if words.is_empty() {
        return;
    }
    content.push(InlineContent::Text(TextRun::new(words.join(" "))));
    words.clear();
}

/// Run grouping, ordering and merging over one unit's elements.
pub fn reconstruct_lines(elements: Vec<PositionedElement>, threshold: f64) -> Vec<Line> {
    order_lines(group_into_lines(elements, threshold))
        .into_iter()
        .map(|cluster| Line {
            center_y: cluster.key,
            content: merge_inline(&cluster.elements),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SelectionState;
    use crate::parser::analyze_result::{SelectionMark, Span, Word};
    use crate::parser::extract::{CHECKBOX_WEIGHT, WORD_WEIGHT};
    use crate::parser::geometry::{Polygon, DEFAULT_LINE_THRESHOLD};

    fn word(content: &str, polygon: Polygon) -> PositionedElement {
        let w = Word {
            content: content.to_string(),
            polygon,
            span: Span::new(0, content.len() as u64),
            confidence: None,
        };
        PositionedElement::from_word(&w, WORD_WEIGHT)
    }

    fn checkbox(state: SelectionState, polygon: Polygon) -> PositionedElement {
        let m = SelectionMark {
            state,
            polygon,
            span: Span::new(0, 10),
            confidence: None,
        };
        PositionedElement::from_mark(&m, CHECKBOX_WEIGHT)
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.plain_text()).collect()
    }

    #[test]
    fn test_hello_world_single_run() {
        let elements = vec![
            word("World", Polygon::rect(60.0, 10.0, 110.0, 20.0)),
            word("Hello", Polygon::rect(0.0, 10.0, 50.0, 20.0)),
        ];
        let lines = reconstruct_lines(elements, DEFAULT_LINE_THRESHOLD);

        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].content,
            vec![InlineContent::Text(TextRun::new("Hello World"))]
        );
        assert_eq!(lines[0].center_y, 15.0);
    }

    #[test]
    fn test_lines_ordered_top_to_bottom() {
        let elements = vec![
            word("third", Polygon::rect(0.0, 40.0, 10.0, 50.0)),
            word("first", Polygon::rect(0.0, 0.0, 10.0, 10.0)),
            word("second", Polygon::rect(0.0, 20.0, 10.0, 30.0)),
        ];
        let clusters = order_lines(group_into_lines(elements, DEFAULT_LINE_THRESHOLD));

        assert_eq!(clusters.len(), 3);
        assert!(clusters.windows(2).all(|w| w[0].key <= w[1].key));
        let lines = reconstruct_lines(
            clusters.into_iter().flat_map(|c| c.elements).collect(),
            DEFAULT_LINE_THRESHOLD,
        );
        assert_eq!(texts(&lines), ["first", "second", "third"]);
    }

    #[test]
    fn test_weak_overlap_opens_new_line() {
        // 5 of 10 units overlap: 0.5 is not above 0.7
        let elements = vec![
            word("a", Polygon::rect(0.0, 0.0, 10.0, 10.0)),
            word("b", Polygon::rect(20.0, 5.0, 30.0, 15.0)),
        ];
        let clusters = group_into_lines(elements, DEFAULT_LINE_THRESHOLD);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_compares_against_last_element_only() {
        // "c" overlaps the first element of the cluster but not the last one
        let elements = vec![
            word("a", Polygon::rect(0.0, 0.0, 10.0, 10.0)),
            word("b", Polygon::rect(20.0, 2.0, 30.0, 12.0)),
            word("c", Polygon::rect(40.0, -2.0, 50.0, 7.0)),
        ];
        let clusters = group_into_lines(elements, DEFAULT_LINE_THRESHOLD);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[1].elements[0].content, "c");
    }

    #[test]
    fn test_first_matching_cluster_wins() {
        let elements = vec![
            word("upper", Polygon::rect(0.0, 0.0, 10.0, 10.0)),
            word("lower", Polygon::rect(20.0, 6.0, 30.0, 16.0)),
            // Overlaps both clusters fully; the earlier cluster takes it
            word("tall", Polygon::rect(40.0, 0.0, 50.0, 16.0)),
        ];
        let clusters = group_into_lines(elements, DEFAULT_LINE_THRESHOLD);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[0].elements[1].content, "tall");
    }

    #[test]
    fn test_colliding_keys_kept_distinct() {
        // Both have midpoint 5; the flat one has zero height so neither
        // ratio exceeds the threshold
        let elements = vec![
            word("box", Polygon::rect(0.0, 0.0, 10.0, 10.0)),
            word("flat", Polygon::rect(20.0, 5.0, 30.0, 5.0)),
        ];
        let clusters = group_into_lines(elements, DEFAULT_LINE_THRESHOLD);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].key, clusters[1].key);

        let ordered = order_lines(clusters);
        assert_eq!(ordered[0].elements[0].content, "box");
        assert_eq!(ordered[1].elements[0].content, "flat");
    }

    #[test]
    fn test_checkbox_before_word_at_same_x() {
        let mut elements = vec![
            word("Yes", Polygon::rect(0.0, 0.0, 10.0, 10.0)),
            checkbox(SelectionState::Selected, Polygon::rect(0.0, 0.0, 10.0, 10.0)),
        ];
        sort_line(&mut elements);

        assert!(!elements[0].is_word());
        assert!(elements[1].is_word());
    }

    #[test]
    fn test_within_line_ordering() {
        let mut elements = vec![
            word("c", Polygon::rect(40.0, 0.0, 50.0, 10.0)),
            checkbox(SelectionState::Unselected, Polygon::rect(20.0, 0.0, 30.0, 10.0)),
            word("a", Polygon::rect(0.0, 0.0, 10.0, 10.0)),
            word("b", Polygon::rect(20.0, 0.0, 30.0, 10.0)),
        ];
        sort_line(&mut elements);

        for pair in elements.windows(2) {
            assert!(pair[0].center.x <= pair[1].center.x);
            if pair[0].center.x == pair[1].center.x {
                assert!(pair[0].weight >= pair[1].weight);
            }
        }
        assert_eq!(elements[1].content, "unselected");
    }

    #[test]
    fn test_merge_inline_breaks_runs_at_checkboxes() {
        let elements = vec![
            word("Married", Polygon::rect(0.0, 0.0, 10.0, 10.0)),
            checkbox(SelectionState::Selected, Polygon::rect(12.0, 0.0, 14.0, 10.0)),
            word("Yes", Polygon::rect(16.0, 0.0, 20.0, 10.0)),
            checkbox(SelectionState::Unselected, Polygon::rect(22.0, 0.0, 24.0, 10.0)),
            word("No", Polygon::rect(26.0, 0.0, 30.0, 10.0)),
            word("answer", Polygon::rect(32.0, 0.0, 40.0, 10.0)),
        ];
        let content = merge_inline(&elements);

        assert_eq!(
            content,
            vec![
                InlineContent::Text(TextRun::new("Married")),
                InlineContent::Checkbox {
                    state: SelectionState::Selected
                },
                InlineContent::Text(TextRun::new("Yes")),
                InlineContent::Checkbox {
                    state: SelectionState::Unselected
                },
                InlineContent::Text(TextRun::new("No answer")),
            ]
        );
    }

    #[test]
    fn test_merge_inline_only_checkboxes() {
        let elements = vec![
            checkbox(SelectionState::Selected, Polygon::rect(0.0, 0.0, 1.0, 1.0)),
            checkbox(SelectionState::Selected, Polygon::rect(2.0, 0.0, 3.0, 1.0)),
        ];
        let content = merge_inline(&elements);
        assert_eq!(content.len(), 2);
        assert!(content
            .iter()
            .all(|c| matches!(c, InlineContent::Checkbox { .. })));
    }

    #[test]
    fn test_empty_input() {
        assert!(group_into_lines(Vec::new(), DEFAULT_LINE_THRESHOLD).is_empty());
        assert!(reconstruct_lines(Vec::new(), DEFAULT_LINE_THRESHOLD).is_empty());
        assert!(merge_inline(&[]).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let make = || {
            vec![
                word("b", Polygon::rect(20.0, 1.0, 30.0, 11.0)),
                word("a", Polygon::rect(0.0, 0.0, 10.0, 10.0)),
                checkbox(SelectionState::Selected, Polygon::rect(20.0, 1.0, 30.0, 11.0)),
                word("c", Polygon::rect(0.0, 30.0, 10.0, 40.0)),
            ]
        };
        let first = reconstruct_lines(make(), DEFAULT_LINE_THRESHOLD);
        let second = reconstruct_lines(make(), DEFAULT_LINE_THRESHOLD);
        assert_eq!(first, second);
        assert_eq!(texts(&first), ["a [x] b", "c"]);
    }
}
