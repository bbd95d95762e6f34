//! Splitting a page's paragraphs into tables and paragraph groups.
//!
//! The analysis reports every table cell a second time as a top-level
//! paragraph. Such paragraphs are recognised by an exact polygon match with
//! a cell and replaced by their table, scheduled once at the position of the
//! first paragraph that points at it. The remaining paragraphs are batched
//! into groups of consecutive text paragraphs.

use indexmap::IndexMap;

use super::analyze_result::{AnalyzedParagraph, AnalyzedTable};
use super::geometry::Polygon;

/// One item of a page's reading order.
#[derive(Debug, Clone)]
pub enum PageItem<'a> {
    /// A run of consecutive text paragraphs, reconstructed together
    Paragraphs(Vec<&'a AnalyzedParagraph>),
    /// A table
    Table(&'a AnalyzedTable),
}

impl PageItem<'_> {
    /// Check if this item is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, PageItem::Table(_))
    }
}

/// Find the first table with a cell whose polygon equals `polygon`
/// coordinate for coordinate.
pub fn find_owning_table<'a>(
    polygon: &Polygon,
    tables: &[&'a AnalyzedTable],
) -> Option<(usize, &'a AnalyzedTable)> {
    tables.iter().copied().enumerate().find(|(_, table)| {
        table
            .cells
            .iter()
            .any(|cell| cell.region().is_some_and(|r| r.polygon == *polygon))
    })
}

/// Tables already placed on the page.
#[derive(Debug, Default)]
struct ScheduledTables {
    indices: Vec<usize>,
    polygons: Vec<Polygon>,
}

impl ScheduledTables {
    /// Record a table; returns false if it (or a table with the same
    /// outline) was already placed.
    fn insert(&mut self, index: usize, table: &AnalyzedTable) -> bool {
        if self.indices.contains(&index) {
            return false;
        }
        if let Some(region) = table.region() {
            if self.polygons.contains(&region.polygon) {
                return false;
            }
            self.polygons.push(region.polygon);
        }
        self.indices.push(index);
        true
    }

    fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }
}

/// Partition the paragraphs of one page.
///
/// `paragraphs` and `tables` must already be restricted to the page. With
/// `include_orphans`, tables no paragraph refers to are appended at the end.
pub fn partition_page<'a>(
    paragraphs: &[&'a AnalyzedParagraph],
    tables: &[&'a AnalyzedTable],
    include_orphans: bool,
) -> Vec<PageItem<'a>> {
    let mut items = Vec::new();
    let mut scheduled = ScheduledTables::default();
    let mut text_run: Vec<&'a AnalyzedParagraph> = Vec::new();

    for &paragraph in paragraphs {
        let owner = paragraph
            .region()
            .and_then(|r| find_owning_table(&r.polygon, tables));

        match owner {
            Some((index, table)) => {
                // Further cells of a placed table vanish without splitting
                // the text around them
                if scheduled.insert(index, table) {
                    if !text_run.is_empty() {
                        items.push(PageItem::Paragraphs(std::mem::take(&mut text_run)));
                    }
                    items.push(PageItem::Table(table));
                }
            }
            None => text_run.push(paragraph),
        }
    }

    if !text_run.is_empty() {
        items.push(PageItem::Paragraphs(text_run));
    }

    if include_orphans {
        for (index, &table) in tables.iter().enumerate() {
            if !scheduled.contains(index) && scheduled.insert(index, table) {
                log::debug!("Appending orphan table {} with {} cells", index, table.cells.len());
                items.push(PageItem::Table(table));
            }
        }
    }

    items
}

/// Group cells by row index, rows in order of first appearance and cells in
/// encounter order.
pub fn group_cells_by_row<T, I, F>(cells: I, row_of: F) -> IndexMap<u32, Vec<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> u32,
{
    let mut rows: IndexMap<u32, Vec<T>> = IndexMap::new();
    for cell in cells {
        rows.entry(row_of(&cell)).or_default().push(cell);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::analyze_result::{AnalyzedCell, BoundingRegion, CellKind, Span};

    fn region(polygon: Polygon) -> Vec<BoundingRegion> {
        vec![BoundingRegion {
            page_number: 1,
            polygon,
        }]
    }

    fn paragraph(text: &str, polygon: Polygon) -> AnalyzedParagraph {
        AnalyzedParagraph {
            content: Some(text.to_string()),
            role: None,
            bounding_regions: region(polygon),
            spans: vec![Span::new(0, text.len() as u64)],
        }
    }

    fn cell(row: u32, column: u32, polygon: Polygon) -> AnalyzedCell {
        AnalyzedCell {
            row_index: row,
            column_index: column,
            row_span: 1,
            column_span: 1,
            kind: CellKind::Content,
            content: None,
            bounding_regions: region(polygon),
            spans: Vec::new(),
        }
    }

    fn table(outline: Polygon, cells: Vec<AnalyzedCell>) -> AnalyzedTable {
        AnalyzedTable {
            row_count: None,
            column_count: None,
            bounding_regions: region(outline),
            cells,
        }
    }

    fn cell_box(row: u32, column: u32) -> Polygon {
        let (x, y) = (column as f64 * 10.0, 100.0 + row as f64 * 10.0);
        Polygon::rect(x, y, x + 10.0, y + 10.0)
    }

    fn sample_table() -> AnalyzedTable {
        table(
            Polygon::rect(0.0, 100.0, 20.0, 120.0),
            vec![
                cell(0, 0, cell_box(0, 0)),
                cell(0, 1, cell_box(0, 1)),
                cell(1, 0, cell_box(1, 0)),
                cell(1, 1, cell_box(1, 1)),
            ],
        )
    }

    #[test]
    fn test_consecutive_text_batched() {
        let a = paragraph("Name:", Polygon::rect(0.0, 0.0, 10.0, 10.0));
        let b = paragraph("John", Polygon::rect(20.0, 0.0, 30.0, 10.0));
        let items = partition_page(&[&a, &b], &[], false);

        assert_eq!(items.len(), 1);
        match &items[0] {
            PageItem::Paragraphs(group) => assert_eq!(group.len(), 2),
            PageItem::Table(_) => panic!("Expected paragraph group"),
        }
    }

    #[test]
    fn test_table_deduplicated_at_first_position() {
        let t = sample_table();
        let intro = paragraph("Intro", Polygon::rect(0.0, 0.0, 50.0, 10.0));
        let c1 = paragraph("a", cell_box(0, 0));
        let c2 = paragraph("b", cell_box(1, 1));
        let outro = paragraph("Outro", Polygon::rect(0.0, 200.0, 50.0, 210.0));

        let items = partition_page(&[&intro, &c1, &c2, &outro], &[&t], false);

        assert_eq!(items.len(), 3);
        assert!(!items[0].is_table());
        assert!(items[1].is_table());
        assert!(!items[2].is_table());
        assert_eq!(items.iter().filter(|i| i.is_table()).count(), 1);
    }

    #[test]
    fn test_table_breaks_text_run() {
        let t = sample_table();
        let before = paragraph("before", Polygon::rect(0.0, 0.0, 50.0, 10.0));
        let c1 = paragraph("a", cell_box(0, 0));
        let after = paragraph("after", Polygon::rect(0.0, 200.0, 50.0, 210.0));

        let items = partition_page(&[&before, &c1, &after], &[&t], false);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_placed_table_cell_does_not_split_text() {
        let t = sample_table();
        let c1 = paragraph("a", cell_box(0, 0));
        let label = paragraph("label", Polygon::rect(0.0, 0.0, 50.0, 10.0));
        let c2 = paragraph("b", cell_box(1, 1));
        let value = paragraph("value", Polygon::rect(60.0, 0.0, 90.0, 10.0));

        let items = partition_page(&[&c1, &label, &c2, &value], &[&t], false);

        assert_eq!(items.len(), 2);
        match &items[1] {
            PageItem::Paragraphs(group) => assert_eq!(group.len(), 2),
            PageItem::Table(_) => panic!("Expected paragraph group"),
        }
    }

    #[test]
    fn test_near_match_is_text() {
        let t = sample_table();
        let almost = paragraph("a", Polygon::rect(0.0, 100.0, 10.0, 110.001));
        let items = partition_page(&[&almost], &[&t], false);

        assert_eq!(items.len(), 1);
        assert!(!items[0].is_table());
    }

    #[test]
    fn test_tables_with_same_outline_deduplicated() {
        let t1 = sample_table();
        let t2 = sample_table();
        let c1 = paragraph("a", cell_box(0, 0));
        // Matches the first table again since lookup takes the first owner
        let c2 = paragraph("b", cell_box(0, 1));

        let items = partition_page(&[&c1, &c2], &[&t1, &t2], true);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_orphan_tables() {
        let t = sample_table();
        let text = paragraph("only text", Polygon::rect(0.0, 0.0, 50.0, 10.0));

        let without = partition_page(&[&text], &[&t], false);
        assert_eq!(without.len(), 1);

        let with = partition_page(&[&text], &[&t], true);
        assert_eq!(with.len(), 2);
        assert!(with[1].is_table());
    }

    #[test]
    fn test_group_cells_by_row_first_appearance() {
        let cells = vec![
            cell(1, 1, cell_box(1, 1)),
            cell(0, 0, cell_box(0, 0)),
            cell(1, 0, cell_box(1, 0)),
            cell(0, 1, cell_box(0, 1)),
        ];
        let rows = group_cells_by_row(&cells, |c| c.row_index);

        let order: Vec<u32> = rows.keys().copied().collect();
        assert_eq!(order, [1, 0]);
        // Encounter order, no column sort
        let columns: Vec<u32> = rows[&1].iter().map(|c| c.column_index).collect();
        assert_eq!(columns, [1, 0]);
    }
}
