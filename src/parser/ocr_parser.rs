//! Layout reconstruction of an analysis result.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use rayon::prelude::*;

use crate::detect::{detect_status_from_bytes, AnalysisStatus};
use crate::error::{Error, Result};
use crate::model::{Block, Document, Metadata, Page, Paragraph, Table, TableCell, TableRow};

use super::analyze_result::{
    AnalyzeResponse, AnalyzeResult, AnalyzedCell, AnalyzedPage, AnalyzedParagraph, AnalyzedTable,
    SelectionMark, Word,
};
use super::extract::{to_elements, words_in_span, MarkClaims};
use super::geometry::union_bounding_box;
use super::layout::reconstruct_lines;
use super::options::{ErrorMode, LayoutOptions};
use super::partition::{group_cells_by_row, partition_page, PageItem};

/// Analysis result parser.
pub struct AnalysisParser {
    status: AnalysisStatus,
    response: Option<AnalyzeResponse>,
    options: LayoutOptions,
}

impl AnalysisParser {
    /// Open an analysis JSON file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, LayoutOptions::default())
    }

    /// Open an analysis JSON file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: LayoutOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse an analysis from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_bytes_with_options(json.as_bytes(), LayoutOptions::default())
    }

    /// Parse an analysis from a JSON string with custom options.
    pub fn from_json_with_options(json: &str, options: LayoutOptions) -> Result<Self> {
        Self::from_bytes_with_options(json.as_bytes(), options)
    }

    /// Parse an analysis from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, LayoutOptions::default())
    }

    /// Parse an analysis from bytes with custom options.
    ///
    /// Only a succeeded analysis has its payload deserialized.
    pub fn from_bytes_with_options(data: &[u8], options: LayoutOptions) -> Result<Self> {
        let status = detect_status_from_bytes(data)?;
        let response = if status.is_succeeded() {
            Some(serde_json::from_slice::<AnalyzeResponse>(data)?)
        } else {
            None
        };

        Ok(Self {
            status,
            response,
            options,
        })
    }

    /// Parse an analysis from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, LayoutOptions::default())
    }

    /// Parse an analysis from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: LayoutOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Wrap an already deserialized response.
    pub fn from_response(response: AnalyzeResponse, options: LayoutOptions) -> Self {
        let status = AnalysisStatus::from_wire(&response.status);
        let response = status.is_succeeded().then_some(response);
        Self {
            status,
            response,
            options,
        }
    }

    /// Status of the analysis.
    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    /// The deserialized response, present for a succeeded analysis.
    pub fn response(&self) -> Option<&AnalyzeResponse> {
        self.response.as_ref()
    }

    /// Number of pages in the analysis.
    pub fn page_count(&self) -> u32 {
        self.response
            .as_ref()
            .and_then(|r| r.analyze_result.as_ref())
            .map_or(0, |r| r.pages.len() as u32)
    }

    /// Reconstruct the layout and return a structured Document.
    ///
    /// A non-succeeded analysis yields an empty document.
    pub fn parse(&self) -> Result<Document> {
        let Some(response) = &self.response else {
            log::info!("Analysis status is '{}', nothing to reconstruct", self.status);
            let mut document = Document::new();
            document.metadata = Metadata::with_status(self.status.as_str());
            return Ok(document);
        };

        let result = response
            .analyze_result
            .as_ref()
            .ok_or_else(|| Error::MissingField("analyzeResult".to_string()))?;

        let mut document = Document::new();
        document.metadata = extract_metadata(response, result);

        let content = self.assign_pages(result)?;

        let mut pages: Vec<&AnalyzedPage> = result
            .pages
            .iter()
            .filter(|p| self.options.pages.includes(p.page_number))
            .collect();
        pages.sort_by_key(|p| p.page_number);

        for page in pages {
            let paragraphs = content.paragraphs.get(&page.page_number).map_or(&[][..], Vec::as_slice);
            let tables = content.tables.get(&page.page_number).map_or(&[][..], Vec::as_slice);
            document.add_page(self.parse_page(page, paragraphs, tables));
        }

        Ok(document)
    }

    /// Distribute paragraphs and tables over the pages named by their first
    /// bounding region.
    fn assign_pages<'a>(&self, result: &'a AnalyzeResult) -> Result<PageContent<'a>> {
        let page_count = result.pages.len() as u32;
        let mut content = PageContent::default();

        for (i, paragraph) in result.paragraphs.iter().enumerate() {
            let Some(region) = paragraph.region() else {
                self.tolerate(Error::MissingField(format!("paragraphs[{}].boundingRegions", i)))?;
                continue;
            };
            if result.page(region.page_number).is_none() {
                self.tolerate(Error::PageOutOfRange(region.page_number, page_count))?;
                continue;
            }
            content
                .paragraphs
                .entry(region.page_number)
                .or_default()
                .push(paragraph);
        }

        for (i, table) in result.tables.iter().enumerate() {
            let Some(region) = table.region() else {
                self.tolerate(Error::MissingField(format!("tables[{}].boundingRegions", i)))?;
                continue;
            };
            if result.page(region.page_number).is_none() {
                self.tolerate(Error::PageOutOfRange(region.page_number, page_count))?;
                continue;
            }
            for (j, cell) in table.cells.iter().enumerate() {
                if cell.region().is_none() {
                    self.tolerate(Error::MissingField(format!(
                        "tables[{}].cells[{}].boundingRegions",
                        i, j
                    )))?;
                }
            }
            content.tables.entry(region.page_number).or_default().push(table);
        }

        Ok(content)
    }

    /// Fail in strict mode, log and continue in lenient mode.
    fn tolerate(&self, error: Error) -> Result<()> {
        match self.options.error_mode {
            ErrorMode::Strict => Err(error),
            ErrorMode::Lenient => {
                log::warn!("Skipping malformed entity: {}", error);
                Ok(())
            }
        }
    }

    /// Reconstruct one page.
    fn parse_page(
        &self,
        page: &AnalyzedPage,
        paragraphs: &[&AnalyzedParagraph],
        tables: &[&AnalyzedTable],
    ) -> Page {
        let items = partition_page(paragraphs, tables, self.options.include_orphan_tables);
        let units = self.prepare_units(page, &items);

        let blocks: Vec<Option<Block>> = if self.options.parallel {
            units.par_iter().map(|u| self.build_block(u)).collect()
        } else {
            units.iter().map(|u| self.build_block(u)).collect()
        };

        let mut result = Page::new(page.page_number).with_dimensions(
            page.width,
            page.height,
            page.unit.clone(),
        );
        for block in blocks.into_iter().flatten() {
            result.add_block(block);
        }

        log::debug!(
            "Page {}: {} paragraphs, {} tables, {} words, {} marks -> {} blocks",
            page.page_number,
            paragraphs.len(),
            tables.len(),
            page.words.len(),
            page.selection_marks.len(),
            result.block_count()
        );

        result
    }

    /// Select the words and marks of every unit of the page.
    ///
    /// Table cells claim marks by span before paragraph groups claim the
    /// remaining ones by region, so no mark is attributed twice.
    fn prepare_units<'a>(&self, page: &'a AnalyzedPage, items: &[PageItem<'a>]) -> Vec<Unit<'a>> {
        let mut claims = MarkClaims::new(&page.selection_marks);

        let mut table_units: Vec<Vec<CellUnit<'a>>> = Vec::new();
        for item in items {
            if let PageItem::Table(table) = item {
                let mut cells = Vec::with_capacity(table.cells.len());
                for cell in &table.cells {
                    cells.push(CellUnit {
                        cell,
                        words: words_in_span(&cell.spans, &page.words),
                        marks: claims.claim_in_spans(&cell.spans),
                    });
                }
                table_units.push(cells);
            }
        }

        let mut table_units = table_units.into_iter();
        let mut units = Vec::with_capacity(items.len());
        for item in items {
            match item {
                PageItem::Table(_) => {
                    units.push(Unit::Table(table_units.next().unwrap_or_default()));
                }
                PageItem::Paragraphs(group) => {
                    let words: Vec<&'a Word> = group
                        .iter()
                        .flat_map(|p| words_in_span(&p.spans, &page.words))
                        .collect();
                    let marks = match union_bounding_box(words.iter().map(|w| &w.polygon)) {
                        Some(region) => claims.claim_in_region(&region, self.options.region_threshold),
                        None => Vec::new(),
                    };
                    units.push(Unit::Group { words, marks });
                }
            }
        }

        if claims.unclaimed_count() > 0 {
            log::debug!(
                "Page {}: {} selection marks outside any paragraph or cell",
                page.page_number,
                claims.unclaimed_count()
            );
        }

        units
    }

    /// Build the block of one unit; empty paragraph groups produce nothing.
    fn build_block(&self, unit: &Unit<'_>) -> Option<Block> {
        match unit {
            Unit::Group { words, marks } => {
                let elements = to_elements(words, marks, self.options.weights);
                let lines = reconstruct_lines(elements, self.options.line_threshold);
                if lines.is_empty() {
                    return None;
                }
                Some(Block::Paragraph(Paragraph::from_lines(lines)))
            }
            Unit::Table(cells) => {
                let cells: Vec<TableCell> = if self.options.parallel {
                    cells.par_iter().map(|c| self.build_cell(c)).collect()
                } else {
                    cells.iter().map(|c| self.build_cell(c)).collect()
                };

                let mut table = Table::new();
                for (index, cells) in group_cells_by_row(cells, |c| c.row_index) {
                    table.add_row(TableRow::new(index, cells));
                }
                Some(Block::Table(table))
            }
        }
    }

    fn build_cell(&self, unit: &CellUnit<'_>) -> TableCell {
        let elements = to_elements(&unit.words, &unit.marks, self.options.weights);
        let cell = unit.cell;
        TableCell {
            row_index: cell.row_index,
            column_index: cell.column_index,
            row_span: cell.row_span,
            column_span: cell.column_span,
            kind: cell.kind,
            lines: reconstruct_lines(elements, self.options.line_threshold),
        }
    }
}

/// Paragraphs and tables per page number.
#[derive(Default)]
struct PageContent<'a> {
    paragraphs: HashMap<u32, Vec<&'a AnalyzedParagraph>>,
    tables: HashMap<u32, Vec<&'a AnalyzedTable>>,
}

/// An independent unit of reconstruction.
enum Unit<'a> {
    Group {
        words: Vec<&'a Word>,
        marks: Vec<&'a SelectionMark>,
    },
    Table(Vec<CellUnit<'a>>),
}

struct CellUnit<'a> {
    cell: &'a AnalyzedCell,
    words: Vec<&'a Word>,
    marks: Vec<&'a SelectionMark>,
}

/// Extract document metadata.
fn extract_metadata(response: &AnalyzeResponse, result: &AnalyzeResult) -> Metadata {
    Metadata {
        status: response.status.clone(),
        api_version: result.api_version.clone(),
        model_id: result.model_id.clone(),
        created: response.created_date_time,
        modified: response.last_updated_date_time,
        page_count: result.pages.len() as u32,
        content_length: result.content.as_deref().map_or(0, |c| c.chars().count()),
    }
}
