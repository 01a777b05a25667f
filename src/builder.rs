//! Builder Module
//!
//! Fluent Builder APIを提供し、`ExpenseReader`インスタンスを段階的に構築する。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::api::{DiagnosticSink, ExpenseFactory};
use crate::error::ImportError;
use crate::extractor::RowExtractor;
use crate::parser::WorkbookParser;
use crate::security::SecurityConfig;

/// 取り込み処理の設定を保持する内部構造体
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ReaderConfig {
    /// 入力サイズの制限
    pub security: SecurityConfig,
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use expense_sheet::ExpenseReaderBuilder;
///
/// # fn main() -> Result<(), expense_sheet::ImportError> {
/// let reader = ExpenseReaderBuilder::new()
///     .with_max_input_size(64 * 1024 * 1024)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ExpenseReaderBuilder {
    /// 内部設定（構築中）
    config: ReaderConfig,
}

impl ExpenseReaderBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 入力サイズの上限: 2GB
    pub fn new() -> Self {
        Self::default()
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    ///
    /// 上限を超える入力は`ImportError::SecurityViolation`で拒否されます。
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.security.max_input_file_size = bytes;
        self
    }

    /// 設定を検証し、`ExpenseReader`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(ExpenseReader)`: 設定が有効な場合
    /// * `Err(ImportError::Config)`: 入力サイズの上限が0の場合
    pub fn build(self) -> Result<ExpenseReader, ImportError> {
        if self.config.security.max_input_file_size == 0 {
            return Err(ImportError::Config(
                "Maximum input size must be greater than zero".to_string(),
            ));
        }

        Ok(ExpenseReader {
            config: self.config,
        })
    }
}

/// 取り込み処理のファサード
///
/// スプレッドシートの最初のワークシートから経費エンティティを読み込む
/// メインエントリーポイントです。
///
/// # 使用例
///
/// ```rust,no_run
/// use expense_sheet::{ConversionError, ExpenseReaderBuilder, FieldRow, LogSink};
///
/// # fn main() -> Result<(), expense_sheet::ImportError> {
/// let reader = ExpenseReaderBuilder::new().build()?;
/// let factory = |fields: FieldRow| -> Result<FieldRow, ConversionError> { Ok(fields) };
///
/// let expenses = reader.read_path("expenses.xls", factory, LogSink)?;
/// println!("{} expense(s) imported", expenses.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExpenseReader {
    config: ReaderConfig,
}

impl ExpenseReader {
    /// リーダーから経費エンティティを読み込む
    ///
    /// # 引数
    ///
    /// * `input` - スプレッドシートを読み込むためのリーダー
    /// * `factory` - 1行分のフィールドからエンティティを生成するファクトリ
    /// * `sink` - スキップされた行の報告先
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<F::Expense>)` - 変換に成功したエンティティ（行番号順）
    /// * `Err(ImportError)` - 読み込み・解析に失敗した場合
    pub fn read<R, F, D>(&self, input: R, factory: F, sink: D) -> Result<Vec<F::Expense>, ImportError>
    where
        R: Read,
        F: ExpenseFactory,
        D: DiagnosticSink,
    {
        let mut parser = WorkbookParser::open(input, &self.config.security)?;
        let sheet = parser.first_sheet()?;
        RowExtractor::new(factory, sink).extract(&sheet)
    }

    /// ファイルパスから経費エンティティを読み込む
    ///
    /// ファイルはこの呼び出しの中で開かれ、正常終了・エラーのどちらの場合も
    /// 呼び出しから戻る前に閉じられます。
    pub fn read_path<P, F, D>(&self, path: P, factory: F, sink: D) -> Result<Vec<F::Expense>, ImportError>
    where
        P: AsRef<Path>,
        F: ExpenseFactory,
        D: DiagnosticSink,
    {
        let path = path.as_ref();
        log::debug!("Reading expenses from {}", path.display());

        let file = File::open(path)?;
        self.read(file, factory, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;
    use crate::types::{FieldRow, RowDiagnostic};
    use std::io::Cursor;

    fn passthrough(fields: FieldRow) -> Result<FieldRow, ConversionError> {
        Ok(fields)
    }

    #[test]
    fn test_builder_defaults() {
        let builder = ExpenseReaderBuilder::new();
        assert_eq!(builder.config, ReaderConfig::default());
        assert_eq!(builder.config.security.max_input_file_size, 2_147_483_648);
    }

    #[test]
    fn test_with_max_input_size() {
        let reader = ExpenseReaderBuilder::new()
            .with_max_input_size(1024)
            .build()
            .unwrap();
        assert_eq!(reader.config.security.max_input_file_size, 1024);
    }

    #[test]
    fn test_build_rejects_zero_limit() {
        let result = ExpenseReaderBuilder::new().with_max_input_size(0).build();
        match result {
            Err(ImportError::Config(msg)) => assert!(msg.contains("greater than zero")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_invalid_input_is_fatal() {
        let reader = ExpenseReaderBuilder::new().build().unwrap();
        let mut diagnostics: Vec<RowDiagnostic> = Vec::new();

        let result = reader.read(
            Cursor::new(b"invalid spreadsheet data".to_vec()),
            passthrough,
            &mut diagnostics,
        );

        assert!(result.is_err());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_read_path_missing_file_is_io_error() {
        let reader = ExpenseReaderBuilder::new().build().unwrap();
        let result = reader.read_path(
            "definitely/not/here/expenses.xls",
            passthrough,
            Vec::<RowDiagnostic>::new(),
        );

        assert!(matches!(result, Err(ImportError::Io(_))));
    }
}
