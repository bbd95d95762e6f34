//! Document model types for reconstructed layout.
//!
//! This module defines the ordered document that bridges analysis parsing
//! and rendering. Pages hold paragraph groups and tables in reading order;
//! paragraph groups and table cells hold visual lines of text runs and
//! checkboxes.

mod document;
mod page;
mod paragraph;
mod table;

pub use document::{Document, Metadata};
pub use page::{Block, Page};
pub use paragraph::{InlineContent, Line, Paragraph, SelectionState, TextRun};
pub use table::{CellKind, Table, TableCell, TableRow};
