//! Output Sink Module
//!
//! 生成したMarkdownをコンソールとファイルに出力するモジュール。
//!
//! - コンソール: `quiet`でない限り標準出力に表示
//! - ファイル: 常に書き込む（`output`指定、または入力ファイルの拡張子を`.md`に置換したパス）

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Ex2MdError;
use crate::extractor::MarkdownTable;

/// 出力設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// コンソールへの表示を抑制する
    pub quiet: bool,

    /// 出力ファイルパス（Noneの場合は入力ファイルから生成）
    pub output: Option<PathBuf>,
}

impl OutputOptions {
    /// 書き込み先のパスを決定
    pub fn target_path(&self, input: &Path) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => default_output_path(input),
        }
    }

    /// コンソールとファイルに出力する
    ///
    /// コンソール出力が先に行われるため、ファイル書き込みに失敗しても
    /// 標準出力には既にテーブルが表示されています。
    ///
    /// # 戻り値
    ///
    /// * `Ok(PathBuf)` - 書き込んだファイルのパス
    /// * `Err(Ex2MdError::WriteFailure)` - ファイルの作成・書き込みに失敗した場合
    pub fn emit<W: Write>(
        &self,
        input: &Path,
        table: &MarkdownTable,
        console: &mut W,
    ) -> Result<PathBuf, Ex2MdError> {
        let markdown = table.to_markdown();

        if !self.quiet {
            writeln!(console, "{}", markdown)?;
            console.flush()?;
        }

        let target = self.target_path(input);
        write_markdown(&target, &markdown)?;
        Ok(target)
    }
}

/// 入力ファイルの拡張子を`.md`に置き換えたパス
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("md")
}

/// Markdownをファイルに書き込む（既存ファイルは上書き）
pub fn write_markdown(path: &Path, markdown: &str) -> Result<(), Ex2MdError> {
    let to_failure = |source| Ex2MdError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(to_failure)?;
    file.write_all(markdown.as_bytes()).map_err(to_failure)?;
    file.flush().map_err(to_failure)?;

    info!("wrote {} bytes to {}", markdown.len(), path.display());
    Ok(())
}
