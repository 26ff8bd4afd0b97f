//! SpreadsheetML Parser Module
//!
//! Excel 2003 XML形式（SpreadsheetML）のワークブックを解析するモジュール。
//! calamineはこの形式に対応していないため、quick-xmlで直接読み込みます。
//!
//! 対応する要素:
//!
//! - `<Worksheet ss:Name="...">`
//! - `<Row ss:Index="N">`（省略時は前の行の次）
//! - `<Cell ss:Index="N" ss:MergeAcross="M">`（省略時は前のセルの次）
//! - `<Data ss:Type="String|Number|Boolean|DateTime|Error">`
//! - `<ExcelWorkbook><ActiveSheet>N</ActiveSheet></ExcelWorkbook>`
//!
//! `<Comment>`内の`<Data>`はセル値として扱いません。

use chrono::NaiveDateTime;
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Ex2MdError;
use crate::grid::Worksheet;
use crate::range::{MAX_COLUMN, MAX_ROW};
use crate::types::CellValue;

/// 解析済みのSpreadsheetMLワークブック
#[derive(Debug, Clone)]
pub(crate) struct SpreadsheetXml {
    sheets: Vec<Worksheet>,
    active: usize,
}

/// 解析中の位置
///
/// 行・列は常に`1..=MAX_ROW`/`1..=MAX_COLUMN`に収まり、範囲外の`ss:Index`や
/// `ss:MergeAcross`は`Ex2MdError::Xml`になります。
#[derive(Default)]
struct Cursor {
    row: u32,
    column: u32,
    merge_across: u32,
}

impl Cursor {
    fn start_row(&mut self, index: Option<u32>) -> Result<(), Ex2MdError> {
        self.row = advance(self.row, index, 1, MAX_ROW, "row")?;
        self.column = 0;
        self.merge_across = 0;
        Ok(())
    }

    fn start_cell(
        &mut self,
        index: Option<u32>,
        merge_across: Option<u32>,
    ) -> Result<(), Ex2MdError> {
        self.column = advance(self.column, index, 1, MAX_COLUMN, "column")?;
        self.merge_across = merge_across.unwrap_or(0);
        Ok(())
    }

    fn end_cell(&mut self) -> Result<(), Ex2MdError> {
        self.column = advance(self.column, None, self.merge_across, MAX_COLUMN, "column")?;
        self.merge_across = 0;
        Ok(())
    }
}

/// 明示されたインデックス、または`current + step`を上限付きで求める
fn advance(
    current: u32,
    index: Option<u32>,
    step: u32,
    max: u32,
    axis: &str,
) -> Result<u32, Ex2MdError> {
    let next = match index {
        Some(index) => index,
        None => current.checked_add(step).ok_or_else(|| {
            Ex2MdError::Xml(format!("{} position overflows after {}", axis, current))
        })?,
    };
    if next == 0 || next > max {
        return Err(Ex2MdError::Xml(format!("{} {} is outside 1..={}", axis, next, max)));
    }
    Ok(next)
}

impl SpreadsheetXml {
    /// XMLバイト列を解析する
    ///
    /// # 戻り値
    ///
    /// * `Ok(SpreadsheetXml)` - 解析に成功した場合
    /// * `Err(Ex2MdError::Xml)` - XMLが不正、または`<Workbook>`ルートがない場合
    pub fn parse(bytes: &[u8]) -> Result<Self, Ex2MdError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(false);

        let mut buf = Vec::new();
        let mut sheets: Vec<Worksheet> = Vec::new();
        let mut current: Option<Worksheet> = None;
        let mut cursor = Cursor::default();

        let mut saw_workbook = false;
        let mut comment_depth = 0u32;
        let mut data_type: Option<String> = None;
        let mut data_text = String::new();
        let mut in_active_sheet = false;
        let mut active_text = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"Workbook" => saw_workbook = true,
                    b"Worksheet" => {
                        current = Some(Worksheet::new(sheet_name(&reader, &e, sheets.len())?));
                        cursor = Cursor::default();
                    }
                    b"Row" => cursor.start_row(numeric_attribute(&reader, &e, b"Index")?)?,
                    b"Cell" => cursor.start_cell(
                        numeric_attribute(&reader, &e, b"Index")?,
                        numeric_attribute(&reader, &e, b"MergeAcross")?,
                    )?,
                    b"Comment" => comment_depth += 1,
                    b"Data" if comment_depth == 0 => {
                        data_type = Some(attribute(&reader, &e, b"Type")?.unwrap_or_default());
                        data_text.clear();
                    }
                    b"ActiveSheet" => {
                        in_active_sheet = true;
                        active_text.clear();
                    }
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"Workbook" => saw_workbook = true,
                    b"Worksheet" => {
                        sheets.push(Worksheet::new(sheet_name(&reader, &e, sheets.len())?));
                    }
                    b"Row" => cursor.start_row(numeric_attribute(&reader, &e, b"Index")?)?,
                    b"Cell" => {
                        cursor.start_cell(
                            numeric_attribute(&reader, &e, b"Index")?,
                            numeric_attribute(&reader, &e, b"MergeAcross")?,
                        )?;
                        cursor.end_cell()?;
                    }
                    b"Data" if comment_depth == 0 => {
                        let kind = attribute(&reader, &e, b"Type")?.unwrap_or_default();
                        store(&mut current, &cursor, data_value(&kind, ""));
                    }
                    _ => {}
                },
                Event::Text(e) => {
                    if data_type.is_some() || in_active_sheet {
                        let text = e.unescape()?;
                        if data_type.is_some() {
                            data_text.push_str(&text);
                        } else {
                            active_text.push_str(&text);
                        }
                    }
                }
                Event::CData(e) => {
                    if data_type.is_some() {
                        data_text.push_str(std::str::from_utf8(&e.into_inner())?);
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"Data" if comment_depth == 0 => {
                        if let Some(kind) = data_type.take() {
                            store(&mut current, &cursor, data_value(&kind, &data_text));
                        }
                    }
                    b"Comment" => comment_depth = comment_depth.saturating_sub(1),
                    b"Cell" => cursor.end_cell()?,
                    b"Worksheet" => {
                        if let Some(sheet) = current.take() {
                            sheets.push(sheet);
                        }
                    }
                    b"ActiveSheet" => in_active_sheet = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_workbook {
            return Err(Ex2MdError::Xml(
                "document is not an Excel 2003 XML workbook (no <Workbook> root)".to_string(),
            ));
        }

        let active = match active_text.trim() {
            "" => 0,
            text => text.parse::<usize>().unwrap_or_else(|_| {
                warn!("ignoring invalid ActiveSheet '{}'", text);
                0
            }),
        };

        debug!(
            "parsed SpreadsheetML workbook with {} sheets (active {})",
            sheets.len(),
            active
        );
        Ok(Self { sheets, active })
    }

    /// すべてのシート名
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name().to_string()).collect()
    }

    /// アクティブシートのインデックス
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// 名前でワークシートを取得
    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }
}

fn store(current: &mut Option<Worksheet>, cursor: &Cursor, value: CellValue) {
    if let Some(sheet) = current.as_mut() {
        if cursor.row > 0 && cursor.column > 0 {
            sheet.set(cursor.row, cursor.column, value);
        }
    }
}

/// `ss:Type`と本文からセル値を生成
fn data_value(kind: &str, text: &str) -> CellValue {
    match kind {
        "Number" => text
            .trim()
            .parse::<f64>()
            .map(CellValue::Number)
            .unwrap_or_else(|_| CellValue::Text(text.to_string())),
        "Boolean" => match text.trim() {
            "1" | "true" | "TRUE" => CellValue::Bool(true),
            "0" | "false" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::Text(text.to_string()),
        },
        "DateTime" => NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%dT%H:%M:%S%.f")
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| CellValue::Text(text.to_string())),
        "Error" => CellValue::Error(text.to_string()),
        _ => CellValue::Text(text.to_string()),
    }
}

fn sheet_name<B>(
    reader: &Reader<B>,
    e: &BytesStart<'_>,
    index: usize,
) -> Result<String, Ex2MdError> {
    Ok(attribute(reader, e, b"Name")?.unwrap_or_else(|| format!("Sheet{}", index + 1)))
}

/// 名前空間プレフィックスを無視して属性値を取得（文字参照は展開済み）
fn attribute<B>(
    reader: &Reader<B>,
    e: &BytesStart<'_>,
    local_name: &[u8],
) -> Result<Option<String>, Ex2MdError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Ex2MdError::Xml(format!("XML attribute error: {}", e)))?;
        if attr.key.local_name().as_ref() == local_name {
            return Ok(Some(attr.decode_and_unescape_value(reader)?.into_owned()));
        }
    }
    Ok(None)
}

fn numeric_attribute<B>(
    reader: &Reader<B>,
    e: &BytesStart<'_>,
    local_name: &[u8],
) -> Result<Option<u32>, Ex2MdError> {
    match attribute(reader, e, local_name)? {
        Some(value) => value.trim().parse::<u32>().map(Some).map_err(|_| {
            Ex2MdError::Xml(format!(
                "attribute {} has non-numeric value '{}'",
                String::from_utf8_lossy(local_name),
                value
            ))
        }),
        None => Ok(None),
    }
}
