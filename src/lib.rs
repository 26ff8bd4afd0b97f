//! ex2md - Convert a range of cells in an Excel worksheet into a Markdown table
//!
//! This crate reads an Excel workbook (Office Open XML `.xlsx`, or an Excel 2003
//! SpreadsheetML `.xml` file), selects one worksheet and a rectangular cell range,
//! and renders the cell values as a pipe-delimited Markdown table.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ex2md::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_name("Sheet1")
//!         .with_range("A1:G16")
//!         .with_headers(true)
//!         .build()?;
//!
//!     let table = converter.convert_file("report.xlsx")?;
//!     print!("{}", table);
//!
//!     Ok(())
//! }
//! ```
//!
//! # In-memory Worksheets
//!
//! ```rust
//! use ex2md::{extract_table, CellRange, CellValue, Worksheet};
//!
//! let sheet = Worksheet::from_rows(
//!     "People",
//!     vec![
//!         vec![CellValue::from("Name"), CellValue::from("Age")],
//!         vec![CellValue::from("Alice"), CellValue::from(30.0)],
//!     ],
//! );
//! let table = extract_table(&sheet, CellRange::new(1, 1, 2, 2), true);
//! assert_eq!(
//!     table.to_markdown(),
//!     "| Name | Age |\n| --- | --- |\n| Alice | 30 |\n"
//! );
//! ```

mod api;
mod builder;
pub mod cli;
mod error;
mod extractor;
mod grid;
mod output;
mod parser;
mod range;
mod security;
mod sniff;
mod types;

// 公開API
pub use api::SheetSelector;
pub use builder::{Converter, ConverterBuilder};
pub use error::Ex2MdError;
pub use extractor::{extract_table, MarkdownTable};
pub use grid::Worksheet;
pub use output::{default_output_path, write_markdown, OutputOptions};
pub use range::{
    column_index_from_string, column_letter_from_index, parse_cell_reference, parse_range,
    resolve_range, MAX_COLUMN, MAX_ROW,
};
pub use sniff::{check_extension, sniff, sniff_file, SpreadsheetKind};
pub use types::{CellRange, CellValue};
