//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// ex2mdクレート全体で使用するエラー型
///
/// すべてのエラーは致命的であり、リトライされません。
/// CLIはメッセージを表示して終了します。
///
/// # 使用例
///
/// ```rust,no_run
/// use ex2md::Ex2MdError;
/// use std::fs::File;
///
/// fn open_input(path: &str) -> Result<(), Ex2MdError> {
///     let _file = File::open(path)?; // Ioエラーに自動変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Ex2MdError {
    /// 入力ファイルの拡張子が`.xlsx`または`.xml`ではない
    #[error("only Excel files with the .xlsx or .xml extension are allowed: {}", .0.display())]
    InvalidExtension(PathBuf),

    /// ファイル内容がExcel形式またはXMLとして判定できない
    #[error("the provided file is not an Excel file: {}", .0.display())]
    ContentTypeMismatch(PathBuf),

    /// パスを持たない入力（リーダー）の内容がExcel形式またはXMLとして判定できない
    #[error("the provided input is not an Excel file")]
    UnrecognizedContent,

    /// `--range`の書式が不正
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use ex2md::{ConverterBuilder, Ex2MdError};
    ///
    /// match ConverterBuilder::new().with_range("A1G16").build() {
    ///     Err(Ex2MdError::RangeFormat(msg)) => println!("範囲エラー: {}", msg),
    ///     _ => {}
    /// }
    /// ```
    #[error("invalid range: {0}")]
    RangeFormat(String),

    /// 指定されたシートがワークブックに存在しない
    #[error("worksheet '{0}' does not exist")]
    SheetNotFound(String),

    /// 出力ファイルの作成または書き込みに失敗
    #[error("failed to write '{}': {source}", .path.display())]
    WriteFailure {
        /// 書き込み先のパス
        path: PathBuf,
        /// 元のI/Oエラー
        source: std::io::Error,
    },

    /// I/O操作中に発生したエラー（入力ファイルの読み込みなど）
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// calamineがワークブックの解析に失敗した
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// XMLの解析エラー（SpreadsheetML、workbook.xml）
    #[error("XML parse error: {0}")]
    Xml(String),

    /// ZIPアーカイブの解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズ、ZIPエントリ数、パストラバーサルなどの制限に
    /// 違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// 設定の検証に失敗したエラー
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<quick_xml::Error> for Ex2MdError {
    fn from(err: quick_xml::Error) -> Self {
        Ex2MdError::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Ex2MdError {
    fn from(err: zip::result::ZipError) -> Self {
        Ex2MdError::Zip(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: Ex2MdError = io_err.into();

        match error {
            Ex2MdError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_parse_error_display() {
        let error: Ex2MdError = calamine::Error::Msg("Corrupted file").into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("Failed to parse Excel file"));
        assert!(error_msg.contains("Corrupted file"));
    }

    #[test]
    fn test_invalid_extension_display() {
        let error = Ex2MdError::InvalidExtension(PathBuf::from("report.csv"));
        assert_eq!(
            error.to_string(),
            "only Excel files with the .xlsx or .xml extension are allowed: report.csv"
        );
    }

    #[test]
    fn test_content_type_mismatch_display() {
        let error = Ex2MdError::ContentTypeMismatch(PathBuf::from("fake.xlsx"));
        assert!(error.to_string().contains("not an Excel file"));
        assert!(error.to_string().contains("fake.xlsx"));
    }

    #[test]
    fn test_unrecognized_content_display() {
        let error = Ex2MdError::UnrecognizedContent;
        assert_eq!(error.to_string(), "the provided input is not an Excel file");
    }

    #[test]
    fn test_sheet_not_found_display() {
        let error = Ex2MdError::SheetNotFound("Summary".to_string());
        assert_eq!(error.to_string(), "worksheet 'Summary' does not exist");
    }

    #[test]
    fn test_write_failure_display() {
        let error = Ex2MdError::WriteFailure {
            path: PathBuf::from("out/table.md"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        };

        let error_msg = error.to_string();
        assert!(error_msg.starts_with("failed to write 'out/table.md'"));
        assert!(error_msg.contains("Permission denied"));
    }

    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), Ex2MdError> {
            let _file = std::fs::File::open("nonexistent_file.xlsx")?;
            Ok(())
        }

        match io_operation() {
            Err(Ex2MdError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    #[test]
    fn test_all_error_formats() {
        assert!(Ex2MdError::RangeFormat("x".to_string())
            .to_string()
            .starts_with("invalid range"));
        assert!(Ex2MdError::Xml("x".to_string())
            .to_string()
            .starts_with("XML parse error"));
        assert!(Ex2MdError::Zip("x".to_string())
            .to_string()
            .starts_with("ZIP archive error"));
        assert!(Ex2MdError::SecurityViolation("x".to_string())
            .to_string()
            .starts_with("Security violation"));
        assert!(Ex2MdError::Config("x".to_string())
            .to_string()
            .starts_with("Configuration error"));
    }
}
