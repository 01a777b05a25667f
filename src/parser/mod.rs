//! Parser Module
//!
//! calamineを使用したワークブック解析の実装。
//! 最初のワークシートを[`crate::grid::Sheet`]として提供します。
//! calamineが公開しない空白セルは、XLSXのXMLから直接取得します。

mod metadata;
mod workbook;

pub(crate) use workbook::WorkbookParser;
pub use workbook::WorkbookSheet;
