//! CLI Module
//!
//! コマンドライン引数の定義と実行処理。バイナリ（`src/main.rs`）はこのモジュールの薄いラッパーです。

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::builder::ConverterBuilder;
use crate::error::Ex2MdError;
use crate::output::OutputOptions;

/// Convert a range of cells in an Excel worksheet into a Markdown table.
#[derive(Parser, Debug)]
#[command(name = "ex2md", version, about)]
pub struct Args {
    /// Name of the Excel file (.xlsx or .xml).
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: PathBuf,

    /// Name of the sheet to convert (default is the active sheet). Name is case sensitive.
    #[arg(short = 's', long = "sheet")]
    pub sheet: Option<String>,

    /// Range of cells to include in the table (e.g. A1:G16).
    #[arg(short = 'r', long = "range")]
    pub range: Option<String>,

    /// Include the first row as the column headers.
    #[arg(short = 'H', long = "headers")]
    pub headers: bool,

    /// Do not print the markdown table.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Override the default file output name.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Args {
    fn output_options(&self) -> OutputOptions {
        OutputOptions {
            quiet: self.quiet,
            output: self.output.clone(),
        }
    }
}

/// 引数に従って変換を実行し、結果をコンソールとファイルに出力する
pub fn run<W: Write>(args: &Args, console: &mut W) -> Result<PathBuf, Ex2MdError> {
    let mut builder = ConverterBuilder::new()
        .with_sheet_selector(args.sheet.clone().into())
        .with_headers(args.headers);
    if let Some(range) = &args.range {
        builder = builder.with_range(range.as_str());
    }
    let converter = builder.build()?;

    let table = converter.convert_file(&args.file)?;
    info!(
        "converted {} into {} lines",
        args.file.display(),
        table.lines().len()
    );

    args.output_options().emit(&args.file, &table, console)
}
