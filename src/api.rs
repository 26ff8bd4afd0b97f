//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// シート選択方式
///
/// 変換対象のシートを選択する方法を指定します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// ワークブックのアクティブシート（デフォルト）
    ///
    /// 保存時に選択されていたシートです。情報がない場合は最初のシートを使用します。
    #[default]
    Active,

    /// シート名指定（大文字小文字を区別）
    ///
    /// 例: `SheetSelector::Name("Sheet1".to_string())`
    Name(String),
}

impl From<Option<String>> for SheetSelector {
    fn from(name: Option<String>) -> Self {
        match name {
            Some(name) => SheetSelector::Name(name),
            None => SheetSelector::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_active() {
        assert_eq!(SheetSelector::default(), SheetSelector::Active);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(SheetSelector::from(None), SheetSelector::Active);
        assert_eq!(
            SheetSelector::from(Some("Data".to_string())),
            SheetSelector::Name("Data".to_string())
        );
    }
}
