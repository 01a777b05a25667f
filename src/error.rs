//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! エラーは2つの階層に分かれます。
//!
//! - [`ImportError`]: 取り込み全体を中断する致命的なエラー（呼び出し元へ伝播）
//! - [`RowError`]: 1行だけを無効にするエラー（診断シンクへ報告され、行はスキップ）

use thiserror::Error;

use crate::types::CellKind;

/// 取り込み全体を中断する致命的なエラー
///
/// ファイルのオープン、読み込み、ワークブックの解析に失敗した場合に発生します。
/// このエラーが返された場合、部分的な結果は返されません。
///
/// # 使用例
///
/// ```rust,no_run
/// use expense_sheet::ImportError;
/// use std::fs::File;
///
/// fn open_expenses(path: &str) -> Result<(), ImportError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ImportError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー（calamine由来）
    ///
    /// ファイル形式が不正、破損したファイル、サポートされていない形式などが
    /// 原因となります。
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// ZIPアーカイブの操作中に発生したエラー
    ///
    /// XLSXパッケージ内のワークシートXMLを読み出せない場合に発生します。
    #[error("ZIP error: {0}")]
    Zip(String),

    /// ワークシートXMLの解析中に発生したエラー
    #[error("XML error: {0}")]
    Xml(String),

    /// ワークブックにワークシートが1枚も存在しない
    #[error("Workbook contains no worksheet")]
    NoWorksheet,

    /// 設定の検証に失敗したエラー
    ///
    /// `ExpenseReaderBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限を超えた場合などに発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

/// セルの値の種類が取り込み対象外であることを示すエラー
///
/// 空白セル、数式セル、エラー値セルなどで発生します。
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unexpected cell type: {kind}")]
pub struct CellTypeError {
    /// 検出されたセルの種類
    pub kind: CellKind,
}

impl CellTypeError {
    pub fn new(kind: CellKind) -> Self {
        Self { kind }
    }
}

/// `ExpenseFactory`が行のフィールドを拒否したことを示すエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    /// 任意のメッセージからエラーを生成
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 1行だけを無効にするエラー
///
/// 行の境界で捕捉され、行番号とともに診断シンクへ報告されます。
/// 取り込み処理は次の行から継続します。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    /// セルの分類に失敗した（セル位置は0始まり）
    #[error("error in cell index {position}: {source}")]
    Cell {
        /// 失敗したセルの位置
        position: u32,
        /// 分類エラー
        #[source]
        source: CellTypeError,
    },

    /// `ExpenseFactory`が行を拒否した
    #[error("row conversion failed: {0}")]
    Conversion(#[from] ConversionError),
}

impl RowError {
    /// セル起因のエラーであれば、その位置を返す
    pub fn cell_position(&self) -> Option<u32> {
        match self {
            RowError::Cell { position, .. } => Some(*position),
            RowError::Conversion(_) => None,
        }
    }
}
