//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::debug;

use crate::api::SheetSelector;
use crate::error::Ex2MdError;
use crate::extractor::{extract_table, MarkdownTable};
use crate::grid::Worksheet;
use crate::parser::Workbook;
use crate::range::{parse_range, resolve_range};
use crate::security::SecurityConfig;
use crate::sniff::{sniff, sniff_file, SpreadsheetKind};
use crate::types::CellRange;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// セル範囲制限（Noneの場合はシートの使用範囲全体）
    pub range: Option<CellRange>,

    /// 範囲の1行目をヘッダー行として出力するか
    pub headers: bool,
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use ex2md::ConverterBuilder;
///
/// # fn main() -> Result<(), ex2md::Ex2MdError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_name("Sheet1")
///     .with_range("A1:G16")
///     .with_headers(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,

    /// 未解析の範囲文字列（`build()`で検証）
    range: Option<String>,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: アクティブシート
    /// - 範囲: シートの使用範囲全体
    /// - ヘッダー: なし
    pub fn new() -> Self {
        Self::default()
    }

    /// 変換対象のシートを選択する
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 変換対象のシートを名前で指定する（大文字小文字を区別）
    pub fn with_sheet_name(self, name: impl Into<String>) -> Self {
        self.with_sheet_selector(SheetSelector::Name(name.into()))
    }

    /// 処理対象のセル範囲を`"A1:G16"`形式で指定する
    ///
    /// 書式は`build()`時に検証され、不正な場合は`Ex2MdError::RangeFormat`を返します。
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// 範囲の1行目をヘッダー行として出力するかを指定する
    pub fn with_headers(mut self, headers: bool) -> Self {
        self.config.headers = headers;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `Ex2MdError::RangeFormat` - 範囲文字列が不正な場合
    pub fn build(mut self) -> Result<Converter, Ex2MdError> {
        if let Some(range) = &self.range {
            self.config.range = Some(parse_range(range)?);
        }
        Ok(Converter {
            config: self.config,
        })
    }
}

/// 変換処理のファサード
///
/// # 使用例
///
/// ```rust,no_run
/// use ex2md::ConverterBuilder;
///
/// # fn main() -> Result<(), ex2md::Ex2MdError> {
/// let converter = ConverterBuilder::new().with_headers(true).build()?;
/// let table = converter.convert_file("report.xlsx")?;
/// print!("{}", table);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConversionConfig,
}

impl Converter {
    /// ファイルを変換する
    ///
    /// 拡張子（`.xlsx`/`.xml`）と内容の両方を検査してから解析します。
    ///
    /// # 処理フロー
    ///
    /// 1. 拡張子の検査
    /// 2. ファイル全体の読み込みと内容の判定
    /// 3. ワークブックを開いてシートを選択
    /// 4. 範囲を決定してMarkdownテーブルを生成
    pub fn convert_file(&self, path: impl AsRef<Path>) -> Result<MarkdownTable, Ex2MdError> {
        let path = path.as_ref();
        crate::sniff::check_extension(path)?;

        let buffer = read_limited(File::open(path)?)?;
        let kind = sniff_file(path, &buffer)?;
        debug!("converting {} as {:?}", path.display(), kind);

        self.convert_buffer(buffer, kind)
    }

    /// リーダーから読み込んで変換する
    ///
    /// 拡張子がないため、内容の判定のみを行います。
    pub fn convert_reader<R: Read>(&self, input: R) -> Result<MarkdownTable, Ex2MdError> {
        let buffer = read_limited(input)?;
        let kind = sniff(&buffer).ok_or(Ex2MdError::UnrecognizedContent)?;
        self.convert_buffer(buffer, kind)
    }

    /// リーダーから読み込んで、Markdownをライターに書き出す
    ///
    /// ```rust,no_run
    /// use ex2md::ConverterBuilder;
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), ex2md::Ex2MdError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// converter.convert(File::open("report.xlsx")?, std::io::stdout())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert<R: Read, W: Write>(&self, input: R, mut output: W) -> Result<(), Ex2MdError> {
        let table = self.convert_reader(input)?;
        output.write_all(table.to_markdown().as_bytes())?;
        output.flush()?;
        Ok(())
    }

    /// リーダーから読み込んでMarkdown文字列に変換する
    pub fn convert_to_string<R: Read>(&self, input: R) -> Result<String, Ex2MdError> {
        Ok(self.convert_reader(input)?.to_markdown())
    }

    /// 読み込み済みのワークシートを変換する（I/Oなし）
    pub fn convert_worksheet(&self, sheet: &Worksheet) -> MarkdownTable {
        let range = resolve_range(self.config.range, sheet);
        extract_table(sheet, range, self.config.headers)
    }

    fn convert_buffer(
        &self,
        buffer: Vec<u8>,
        kind: SpreadsheetKind,
    ) -> Result<MarkdownTable, Ex2MdError> {
        let mut workbook = Workbook::open(buffer, kind)?;
        let sheet_name = workbook.select_sheet(&self.config.sheet_selector)?;
        let sheet = workbook.worksheet(&sheet_name)?;
        Ok(self.convert_worksheet(&sheet))
    }
}

/// 入力サイズの上限までを読み込む
fn read_limited<R: Read>(input: R) -> Result<Vec<u8>, Ex2MdError> {
    let security_config = SecurityConfig::default();
    let mut buffer = Vec::new();
    input
        .take(security_config.max_input_file_size + 1)
        .read_to_end(&mut buffer)?;
    security_config.check_input_size(buffer.len() as u64)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use std::io::Cursor;

    fn people() -> Worksheet {
        Worksheet::from_rows(
            "People",
            vec![
                vec![CellValue::from("Name"), CellValue::from("Age")],
                vec![CellValue::from("Alice"), CellValue::Number(30.0)],
                vec![CellValue::from("Bob"), CellValue::Absent],
            ],
        )
    }

    #[test]
    fn test_converter_builder_new() {
        let builder = ConverterBuilder::new();
        assert_eq!(builder.config.sheet_selector, SheetSelector::Active);
        assert!(builder.config.range.is_none());
        assert!(!builder.config.headers);
        assert!(builder.range.is_none());
    }

    #[test]
    fn test_with_sheet_name() {
        let builder = ConverterBuilder::new().with_sheet_name("Data");
        assert_eq!(
            builder.config.sheet_selector,
            SheetSelector::Name("Data".to_string())
        );
    }

    #[test]
    fn test_build_parses_range() {
        let converter = ConverterBuilder::new().with_range("B2:D9").build().unwrap();
        assert_eq!(converter.config.range, Some(CellRange::new(2, 2, 9, 4)));
    }

    #[test]
    fn test_build_with_invalid_range() {
        match ConverterBuilder::new().with_range("B2-D9").build() {
            Err(Ex2MdError::RangeFormat(_)) => {}
            other => panic!("Expected RangeFormat error, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_method_chaining() {
        let converter = ConverterBuilder::new()
            .with_sheet_name("People")
            .with_range("A1:B3")
            .with_headers(true)
            .build()
            .unwrap();

        assert_eq!(
            converter.config.sheet_selector,
            SheetSelector::Name("People".to_string())
        );
        assert_eq!(converter.config.range, Some(CellRange::new(1, 1, 3, 2)));
        assert!(converter.config.headers);
    }

    #[test]
    fn test_convert_worksheet() {
        let converter = ConverterBuilder::new().with_headers(true).build().unwrap();
        let table = converter.convert_worksheet(&people());
        assert_eq!(
            table.to_markdown(),
            "| Name | Age |\n| --- | --- |\n| Alice | 30 |\n| Bob | None |\n"
        );
    }

    #[test]
    fn test_convert_worksheet_with_range() {
        let converter = ConverterBuilder::new().with_range("A2:A3").build().unwrap();
        let table = converter.convert_worksheet(&people());
        assert_eq!(table.to_markdown(), "| Alice |\n| Bob |\n");
    }

    #[test]
    fn test_convert_xml_reader() {
        let xml = r#"<?xml version="1.0"?>
<Workbook xmlns:ss="urn:schemas-microsoft-com:office:spreadsheet">
 <Worksheet ss:Name="S"><Table>
  <Row><Cell><Data ss:Type="String">k</Data></Cell><Cell><Data ss:Type="Number">2.5</Data></Cell></Row>
 </Table></Worksheet>
</Workbook>"#;
        let converter = ConverterBuilder::new().build().unwrap();
        let markdown = converter.convert_to_string(Cursor::new(xml)).unwrap();
        assert_eq!(markdown, "| k | 2.5 |\n");
    }

    #[test]
    fn test_convert_reader_with_invalid_input() {
        let converter = ConverterBuilder::new().build().unwrap();
        let result = converter.convert_to_string(Cursor::new(b"plain text".to_vec()));
        assert!(matches!(result, Err(Ex2MdError::UnrecognizedContent)));
    }

    #[test]
    fn test_convert_missing_sheet() {
        let xml = r#"<Workbook><Worksheet ss:Name="Only" xmlns:ss="urn:schemas-microsoft-com:office:spreadsheet"/></Workbook>"#;
        let converter = ConverterBuilder::new()
            .with_sheet_name("only")
            .build()
            .unwrap();
        match converter.convert_to_string(Cursor::new(format!("<?xml version=\"1.0\"?>{}", xml))) {
            Err(Ex2MdError::SheetNotFound(name)) => assert_eq!(name, "only"),
            other => panic!("Expected SheetNotFound, got {:?}", other),
        }
    }
}
