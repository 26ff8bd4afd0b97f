//! Grid Module
//!
//! ワークシートを1始まりの`(row, column)`でアクセスできるスパースなグリッドとして保持する。
//! calamineのRangeとSpreadsheetMLリーダーの両方がこの構造に変換されます。

use std::collections::HashMap;

use crate::types::CellValue;

static ABSENT: CellValue = CellValue::Absent;

/// 1枚のワークシート
///
/// 値が存在するセルだけを保持します。範囲外や未入力のセルを読むと
/// `CellValue::Absent`が返ります。
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    /// シート名
    name: String,

    /// (row, column) -> 値（1始まり、Absentは格納しない）
    cells: HashMap<(u32, u32), CellValue>,

    /// 値が存在する最大行（最低1）
    max_row: u32,

    /// 値が存在する最大列（最低1）
    max_column: u32,
}

impl Worksheet {
    /// 空のワークシートを生成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
            max_row: 1,
            max_column: 1,
        }
    }

    /// 行ベクターからワークシートを生成（1行目・1列目から配置）
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use ex2md::{CellValue, Worksheet};
    ///
    /// let sheet = Worksheet::from_rows(
    ///     "Sheet1",
    ///     vec![vec![CellValue::from("Name"), CellValue::from("Age")]],
    /// );
    /// assert_eq!(sheet.max_column(), 2);
    /// ```
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut sheet = Self::new(name);
        for (row_idx, row) in rows.into_iter().enumerate() {
            for (col_idx, value) in row.into_iter().enumerate() {
                sheet.set(row_idx as u32 + 1, col_idx as u32 + 1, value);
            }
        }
        sheet
    }

    /// セルの値を設定する
    ///
    /// `Absent`を設定するとセルが削除されます（最大行・列は縮みません）。
    pub fn set(&mut self, row: u32, column: u32, value: CellValue) {
        if value.is_absent() {
            self.cells.remove(&(row, column));
            return;
        }
        self.max_row = self.max_row.max(row);
        self.max_column = self.max_column.max(column);
        self.cells.insert((row, column), value);
    }

    /// セルの値を取得する（1始まり）
    pub fn cell(&self, row: u32, column: u32) -> &CellValue {
        self.cells.get(&(row, column)).unwrap_or(&ABSENT)
    }

    /// シート名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 値が存在する最大行
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    /// 値が存在する最大列
    pub fn max_column(&self) -> u32 {
        self.max_column
    }

    /// 値が存在するセルの数
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// 値が存在するセルがないかどうか
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sheet_extent() {
        let sheet = Worksheet::new("Empty");
        assert_eq!(sheet.name(), "Empty");
        assert_eq!(sheet.max_row(), 1);
        assert_eq!(sheet.max_column(), 1);
        assert!(sheet.is_empty());
        assert_eq!(sheet.cell(1, 1), &CellValue::Absent);
    }

    #[test]
    fn test_from_rows() {
        let sheet = Worksheet::from_rows(
            "Sheet1",
            vec![
                vec![CellValue::from("Name"), CellValue::from("Age")],
                vec![CellValue::from("Alice"), CellValue::Number(30.0)],
                vec![CellValue::from("Bob"), CellValue::Absent],
            ],
        );

        assert_eq!(sheet.max_row(), 3);
        assert_eq!(sheet.max_column(), 2);
        assert_eq!(sheet.len(), 5);
        assert_eq!(sheet.cell(2, 2), &CellValue::Number(30.0));
        assert_eq!(sheet.cell(3, 2), &CellValue::Absent);
    }

    #[test]
    fn test_trailing_absent_does_not_extend() {
        let sheet = Worksheet::from_rows(
            "Sheet1",
            vec![vec![CellValue::from("a"), CellValue::Absent, CellValue::Absent]],
        );
        assert_eq!(sheet.max_column(), 1);
    }

    #[test]
    fn test_set_and_out_of_range() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set(4, 3, CellValue::from(""));
        assert_eq!(sheet.max_row(), 4);
        assert_eq!(sheet.max_column(), 3);
        assert_eq!(sheet.cell(4, 3), &CellValue::Text(String::new()));
        assert_eq!(sheet.cell(100, 100), &CellValue::Absent);

        sheet.set(4, 3, CellValue::Absent);
        assert_eq!(sheet.cell(4, 3), &CellValue::Absent);
    }
}
