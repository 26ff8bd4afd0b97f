//! Table Extractor Module
//!
//! ワークシートの矩形範囲からMarkdownテーブルを生成する。
//! ファイルI/Oには依存しない純粋な変換処理です。
//!
//! # 出力規則
//!
//! - ヘッダー行: 値のないセルは完全に省略し、区切り行のセル数は出力したヘッダー数と一致する
//! - データ行: 範囲内のすべてのセルが空の行はスキップする
//! - 列: データ行の範囲（ヘッダー行を除く）ですべて空の列はスキップする
//!
//! 列の判定はループ開始前に固定した行範囲で一度だけ行います。
//! スキップされた行に値がある列も、残った行すべてで出力されます。

use std::fmt;

use log::debug;

use crate::grid::Worksheet;
use crate::types::CellRange;

/// Markdownテーブル
///
/// ヘッダー行（任意）、区切り行（任意）、データ行の順に並んだテキスト行です。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownTable {
    lines: Vec<String>,
    header_count: Option<usize>,
}

impl MarkdownTable {
    /// テキスト行
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 出力したヘッダーセルの数（ヘッダーなしの場合は`None`）
    pub fn header_count(&self) -> Option<usize> {
        self.header_count
    }

    /// データ行の数
    pub fn row_count(&self) -> usize {
        match self.header_count {
            Some(_) => self.lines.len().saturating_sub(2),
            None => self.lines.len(),
        }
    }

    /// 行がないかどうか
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 各行を改行で終端したMarkdown文字列
    pub fn to_markdown(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for MarkdownTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

/// 範囲をMarkdownテーブルに変換する
///
/// # 引数
///
/// * `sheet` - 読み込むワークシート
/// * `range` - 変換する範囲（1始まり、両端を含む）
/// * `headers` - 範囲の1行目をヘッダー行として出力するか
///
/// # 使用例
///
/// ```rust
/// use ex2md::{extract_table, CellRange, CellValue, Worksheet};
///
/// let sheet = Worksheet::from_rows(
///     "Sheet1",
///     vec![
///         vec![CellValue::from("Name"), CellValue::from("Age")],
///         vec![CellValue::from("Alice"), CellValue::Number(30.0)],
///     ],
/// );
/// let table = extract_table(&sheet, CellRange::new(1, 1, 2, 2), true);
/// assert_eq!(table.to_markdown(), "| Name | Age |\n| --- | --- |\n| Alice | 30 |\n");
/// ```
pub fn extract_table(sheet: &Worksheet, range: CellRange, headers: bool) -> MarkdownTable {
    let mut lines = Vec::new();
    let mut header_count = None;
    let mut start_row = range.start_row;

    if headers {
        let mut header_line = String::new();
        let mut emitted = 0;
        for column in range.start_column..=range.end_column {
            let value = sheet.cell(start_row, column);
            if value.is_absent() {
                continue;
            }
            push_cell(&mut header_line, &value.to_string());
            emitted += 1;
        }
        header_line.push('|');
        lines.push(header_line);
        lines.push(format!("{}|", "| --- ".repeat(emitted)));
        header_count = Some(emitted);
        start_row += 1;
    }

    let keep_column = non_empty_columns(sheet, start_row, range);
    debug!(
        "{} of {} columns hold data in rows {}..={}",
        keep_column.iter().filter(|keep| **keep).count(),
        keep_column.len(),
        start_row,
        range.end_row
    );

    for row in start_row..=range.end_row {
        let row_is_empty =
            (range.start_column..=range.end_column).all(|column| sheet.cell(row, column).is_absent());
        if row_is_empty {
            continue;
        }

        let mut line = String::new();
        for (offset, column) in (range.start_column..=range.end_column).enumerate() {
            if !keep_column[offset] {
                continue;
            }
            push_cell(&mut line, &sheet.cell(row, column).to_string());
        }
        line.push('|');
        lines.push(line);
    }

    MarkdownTable {
        lines,
        header_count,
    }
}

/// `[start_row, range.end_row]`で1つでも値がある列を`true`とするベクター
fn non_empty_columns(sheet: &Worksheet, start_row: u32, range: CellRange) -> Vec<bool> {
    (range.start_column..=range.end_column)
        .map(|column| (start_row..=range.end_row).any(|row| !sheet.cell(row, column).is_absent()))
        .collect()
}

fn push_cell(line: &mut String, content: &str) {
    line.push_str("| ");
    line.push_str(content);
    line.push(' ');
}
