//! Range Resolver Module
//!
//! `"A1:G16"`形式の範囲文字列を解析し、1始まりの`CellRange`に変換する。
//! 範囲が指定されない場合はワークシートの使用範囲全体を返す。

use log::{debug, warn};

use crate::error::Ex2MdError;
use crate::grid::Worksheet;
use crate::types::CellRange;

/// Excelの最大行数
pub const MAX_ROW: u32 = 1_048_576;

/// Excelの最大列数（XFD）
pub const MAX_COLUMN: u32 = 16_384;

/// 列文字列を1始まりの列インデックスに変換する（"A" -> 1, "Z" -> 26, "AA" -> 27）
///
/// 小文字も受け付けます。空文字列、英字以外、4文字以上、XFDを超える列はエラーです。
pub fn column_index_from_string(letters: &str) -> Result<u32, Ex2MdError> {
    if letters.is_empty() || letters.len() > 3 {
        return Err(Ex2MdError::RangeFormat(format!(
            "'{}' is not a valid column name",
            letters
        )));
    }

    let mut index: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Ex2MdError::RangeFormat(format!(
                "'{}' is not a valid column name",
                letters
            )));
        }
        index = index * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }

    if index > MAX_COLUMN {
        return Err(Ex2MdError::RangeFormat(format!(
            "column '{}' is beyond the last column XFD",
            letters
        )));
    }

    Ok(index)
}

/// 1始まりの列インデックスを列文字列に変換する（1 -> "A", 27 -> "AA"）
///
/// 0は空文字列になります。
pub fn column_letter_from_index(mut index: u32) -> String {
    let mut result = String::new();
    while index > 0 {
        let remainder = (index - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        index = (index - 1) / 26;
    }
    result
}

/// `"B12"`や`"$B$12"`のようなセル参照を`(row, column)`に分解する
pub fn parse_cell_reference(reference: &str) -> Result<(u32, u32), Ex2MdError> {
    let body = reference.strip_prefix('$').unwrap_or(reference);
    let split = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(body.len());
    let (letters, rest) = body.split_at(split);
    let digits = rest.strip_prefix('$').unwrap_or(rest);

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Ex2MdError::RangeFormat(format!(
            "'{}' is not a valid cell reference",
            reference
        )));
    }

    let column = column_index_from_string(letters)?;
    let row: u32 = digits.parse().map_err(|_| {
        Ex2MdError::RangeFormat(format!("row in '{}' is out of range", reference))
    })?;

    if row == 0 {
        return Err(Ex2MdError::RangeFormat(format!(
            "'{}' refers to row 0; rows start at 1",
            reference
        )));
    }
    if row > MAX_ROW {
        return Err(Ex2MdError::RangeFormat(format!(
            "row in '{}' is beyond the last row {}",
            reference, MAX_ROW
        )));
    }

    Ok((row, column))
}

/// `"A1:G16"`形式の範囲文字列を解析する
///
/// # 戻り値
///
/// * `Ok(CellRange)` - 解析に成功した場合
/// * `Err(Ex2MdError::RangeFormat)` - コロンがない、セル参照が不正、開始 > 終了の場合
pub fn parse_range(range: &str) -> Result<CellRange, Ex2MdError> {
    let mut parts = range.split(':');
    let (start, end) = match (parts.next(), parts.next(), parts.next()) {
        (Some(start), Some(end), None) => (start, end),
        _ => {
            return Err(Ex2MdError::RangeFormat(format!(
                "'{}' must have the form <Cell>:<Cell>, e.g. A1:G16",
                range
            )))
        }
    };

    let (start_row, start_column) = parse_cell_reference(start)?;
    let (end_row, end_column) = parse_cell_reference(end)?;

    if start_row > end_row {
        return Err(Ex2MdError::RangeFormat(format!(
            "start row ({}) > end row ({}) in '{}'",
            start_row, end_row, range
        )));
    }
    if start_column > end_column {
        return Err(Ex2MdError::RangeFormat(format!(
            "start column ({}) > end column ({}) in '{}'",
            start_column, end_column, range
        )));
    }

    Ok(CellRange::new(start_row, start_column, end_row, end_column))
}

/// 変換対象の範囲を決定する
///
/// 明示的な範囲がない場合は`(1, 1, max_row, max_column)`を返します。
pub fn resolve_range(explicit: Option<CellRange>, sheet: &Worksheet) -> CellRange {
    let resolved = match explicit {
        Some(range) => {
            if range.end_row > sheet.max_row() || range.end_column > sheet.max_column() {
                warn!(
                    "range {} extends past the populated area of '{}' (A1:{}{})",
                    range,
                    sheet.name(),
                    column_letter_from_index(sheet.max_column()),
                    sheet.max_row()
                );
            }
            range
        }
        None => CellRange::new(1, 1, sheet.max_row(), sheet.max_column()),
    };
    debug!("resolved range {} on '{}'", resolved, sheet.name());
    resolved
}
