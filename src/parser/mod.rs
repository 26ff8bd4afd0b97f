//! Parser Module
//!
//! 判定済みのファイル形式に応じてワークブックを開き、
//! シート選択とワークシートの読み込みを提供します。
//!
//! - Office Open XML / 旧形式Excel: calamine（数式ではなくキャッシュ値を使用）
//! - Excel 2003 SpreadsheetML: quick-xmlによる独自リーダー

mod spreadsheet_xml;
mod workbook;

pub(crate) use spreadsheet_xml::SpreadsheetXml;
pub(crate) use workbook::WorkbookParser;

use log::debug;

use crate::api::SheetSelector;
use crate::error::Ex2MdError;
use crate::grid::Worksheet;
use crate::sniff::SpreadsheetKind;

enum Source {
    Excel(WorkbookParser),
    Xml(SpreadsheetXml),
}

/// 読み取り専用で開いたワークブック
pub(crate) struct Workbook {
    source: Source,
}

impl Workbook {
    /// 判定済みの形式でワークブックを開く
    pub fn open(buffer: Vec<u8>, kind: SpreadsheetKind) -> Result<Self, Ex2MdError> {
        let source = match kind {
            SpreadsheetKind::OfficeOpenXml | SpreadsheetKind::LegacyExcel => {
                Source::Excel(WorkbookParser::open(buffer, kind)?)
            }
            SpreadsheetKind::Xml => Source::Xml(SpreadsheetXml::parse(&buffer)?),
        };
        Ok(Self { source })
    }

    /// すべてのシート名（ワークブック内の順序）
    pub fn sheet_names(&self) -> Vec<String> {
        match &self.source {
            Source::Excel(parser) => parser.sheet_names(),
            Source::Xml(xml) => xml.sheet_names(),
        }
    }

    /// アクティブシートのインデックス（0始まり）
    pub fn active_index(&self) -> usize {
        match &self.source {
            Source::Excel(parser) => parser.active_index(),
            Source::Xml(xml) => xml.active_index(),
        }
    }

    /// シート選択方式に基づいてシート名を決定
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 選択されたシート名
    /// * `Err(Ex2MdError::SheetNotFound)` - 指定された名前のシートがない場合
    /// * `Err(Ex2MdError::Config)` - ワークブックにシートが1枚もない場合
    pub fn select_sheet(&self, selector: &SheetSelector) -> Result<String, Ex2MdError> {
        let names = self.sheet_names();

        let selected = match selector {
            SheetSelector::Active => {
                let index = self.active_index();
                names
                    .get(index)
                    .or_else(|| names.first())
                    .cloned()
                    .ok_or_else(|| {
                        Ex2MdError::Config("workbook contains no worksheets".to_string())
                    })?
            }
            SheetSelector::Name(name) => {
                if !names.contains(name) {
                    return Err(Ex2MdError::SheetNotFound(name.clone()));
                }
                name.clone()
            }
        };

        debug!("selected worksheet '{}' from {:?}", selected, names);
        Ok(selected)
    }

    /// ワークシートを読み込む
    pub fn worksheet(&mut self, name: &str) -> Result<Worksheet, Ex2MdError> {
        match &mut self.source {
            Source::Excel(parser) => parser.worksheet(name),
            Source::Xml(xml) => xml
                .worksheet(name)
                .cloned()
                .ok_or_else(|| Ex2MdError::SheetNotFound(name.to_string())),
        }
    }
}
