//! Workbook Parser Module
//!
//! calamineのラッパーとして、Excelワークブックの読み込みを提供します。
//! アクティブシートはcalamineで取得できないため、`xl/workbook.xml`を直接解析します。

use std::io::{Cursor, Read};

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::NaiveDateTime;
use log::{debug, warn};
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::error::Ex2MdError;
use crate::grid::Worksheet;
use crate::security::SecurityConfig;
use crate::sniff::SpreadsheetKind;
use crate::types::CellValue;

/// ワークブックパーサー
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（xlsx/xls）
    workbook: Sheets<Cursor<Vec<u8>>>,
    /// アクティブシートのインデックス
    active: usize,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// # 引数
    ///
    /// * `buffer` - ファイル全体のバイト列
    /// * `kind` - 判定済みのファイル形式（OOXMLの場合のみアクティブシートを解析）
    pub fn open(buffer: Vec<u8>, kind: SpreadsheetKind) -> Result<Self, Ex2MdError> {
        SecurityConfig::default().check_input_size(buffer.len() as u64)?;

        let active = if kind == SpreadsheetKind::OfficeOpenXml {
            parse_active_tab(&buffer)?
        } else {
            0
        };

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;

        Ok(Self { workbook, active })
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// アクティブシートのインデックス
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// シートを読み込んでワークシートに変換
    pub fn worksheet(&mut self, name: &str) -> Result<Worksheet, Ex2MdError> {
        if !self.workbook.sheet_names().iter().any(|n| n == name) {
            return Err(Ex2MdError::SheetNotFound(name.to_string()));
        }
        let range = self.workbook.worksheet_range(name)?;
        Ok(range_to_worksheet(name, &range))
    }
}

/// calamineのRange（0始まり、開始位置オフセット付き）を1始まりのワークシートに変換
fn range_to_worksheet(name: &str, range: &Range<Data>) -> Worksheet {
    let mut sheet = Worksheet::new(name);
    let (row0, col0) = range.start().unwrap_or((0, 0));

    for (row, col, data) in range.cells() {
        let value = cell_value(data);
        if value.is_absent() {
            continue;
        }
        sheet.set(row0 + row as u32 + 1, col0 + col as u32 + 1, value);
    }

    debug!(
        "loaded '{}': {} cells, extent {}x{}",
        name,
        sheet.len(),
        sheet.max_row(),
        sheet.max_column()
    );
    sheet
}

/// calamineのセル値を`CellValue`に変換
pub(crate) fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            let value = if dt.is_duration() {
                dt.as_duration().map(CellValue::Duration)
            } else if (0.0..1.0).contains(&serial) {
                // 日付部分が0のシリアル値は時刻のみ
                dt.as_datetime().map(|d| CellValue::Time(d.time()))
            } else {
                dt.as_datetime().map(CellValue::DateTime)
            };
            value.unwrap_or(CellValue::Number(serial))
        }
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Absent,
    }
}

/// `xl/workbook.xml`の`<workbookView activeTab="N"/>`を取得
///
/// 要素や属性がない場合は0を返します。
fn parse_active_tab(buffer: &[u8]) -> Result<usize, Ex2MdError> {
    let mut archive = ZipArchive::new(Cursor::new(buffer))?;
    SecurityConfig::default().check_archive(&mut archive)?;

    let mut xml_content = Vec::new();
    match archive.by_name("xl/workbook.xml") {
        Ok(mut file) => {
            file.read_to_end(&mut xml_content)?;
        }
        Err(_) => return Ok(0),
    }

    let mut reader = quick_xml::Reader::from_reader(xml_content.as_slice());
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"workbookView" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| Ex2MdError::Xml(format!("XML attribute error: {}", e)))?;
                    if attr.key.as_ref() == b"activeTab" {
                        let value = std::str::from_utf8(&attr.value)?;
                        return match value.trim().parse::<usize>() {
                            Ok(index) => Ok(index),
                            Err(_) => {
                                warn!("ignoring invalid activeTab '{}'", value);
                                Ok(0)
                            }
                        };
                    }
                }
                return Ok(0);
            }
            Event::Eof => return Ok(0),
            _ => {}
        }
        buf.clear();
    }
}
