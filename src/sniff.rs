//! File Sniffing Module
//!
//! 入力ファイルの拡張子とバイト内容を検査し、実際のファイル形式を判定する。
//! 判定結果によって使用するリーダーを切り替えます。

use std::io::Cursor;
use std::path::Path;

use log::debug;
use zip::ZipArchive;

use crate::error::Ex2MdError;

/// 受け付ける拡張子
const ALLOWED_EXTENSIONS: [&str; 2] = ["xlsx", "xml"];

/// バイト内容から判定したファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    /// Office Open XML（ZIPコンテナ、xlsx/xlsm）
    OfficeOpenXml,

    /// 旧形式のExcel（BIFF、CFBコンテナ）
    LegacyExcel,

    /// XMLドキュメント（Excel 2003 SpreadsheetMLを想定）
    Xml,
}

/// 拡張子が`.xlsx`または`.xml`であることを確認する（大文字小文字は区別しない）
///
/// `Path::extension`で判定するため、ファイル名の本体が必要です。
/// `.xlsx`のようなドットで始まる名前だけのファイルは拡張子なしとして拒否されます。
pub fn check_extension(path: &Path) -> Result<(), Ex2MdError> {
    let allowed = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false);

    if allowed {
        Ok(())
    } else {
        Err(Ex2MdError::InvalidExtension(path.to_path_buf()))
    }
}

/// バイト内容からファイル形式を判定する
///
/// # 戻り値
///
/// * `Some(SpreadsheetKind)` - Excel系コンテナまたはXMLと判定できた場合
/// * `None` - いずれにも該当しない場合
pub fn sniff(bytes: &[u8]) -> Option<SpreadsheetKind> {
    let kind = if infer::doc::is_xlsx(bytes) || is_ooxml_workbook_zip(bytes) {
        Some(SpreadsheetKind::OfficeOpenXml)
    } else if infer::doc::is_xls(bytes) {
        Some(SpreadsheetKind::LegacyExcel)
    } else if is_xml(bytes) {
        Some(SpreadsheetKind::Xml)
    } else {
        None
    };
    debug!("sniffed {} bytes as {:?}", bytes.len(), kind);
    kind
}

/// 拡張子と内容の両方を検査する
///
/// 拡張子が許可されていても、内容がExcel系またはXMLでなければ
/// `ContentTypeMismatch`を返します。
pub fn sniff_file(path: &Path, bytes: &[u8]) -> Result<SpreadsheetKind, Ex2MdError> {
    check_extension(path)?;
    sniff(bytes).ok_or_else(|| Ex2MdError::ContentTypeMismatch(path.to_path_buf()))
}

/// `infer`が識別できないxlsx（エントリ順が標準と異なるものなど）をZIPの中身で判定する
fn is_ooxml_workbook_zip(bytes: &[u8]) -> bool {
    if !infer::archive::is_zip(bytes) {
        return false;
    }
    match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive.file_names().any(|name| name == "xl/workbook.xml"),
        Err(_) => false,
    }
}

/// 先頭のBOMと空白を除いてXML宣言またはルート要素で始まるかを判定
fn is_xml(bytes: &[u8]) -> bool {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let start = body
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(body.len());
    let body = &body[start..];
    infer::text::is_xml(body) || body.starts_with(b"<?xml")
}
