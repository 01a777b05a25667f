//! Grid Module
//!
//! 取り込み処理が読み込むシートの抽象（[`Sheet`]）と、
//! メモリ上のシート実装（[`MemorySheet`]）を提供するモジュール。

use crate::error::ImportError;
use crate::types::{CellValue, SheetRow};

/// 1枚の表形式ワークシート
///
/// 格納されている行を、行番号の昇順で1回だけ走査できるソースです。
/// ストリーミング実装は走査の途中で失敗してもよく、その失敗は致命的なエラーとして
/// 取り込み全体を中断します。
pub trait Sheet {
    /// 格納されている行を行番号の昇順で返す
    fn rows(&self) -> impl Iterator<Item = Result<SheetRow, ImportError>> + '_;
}

/// メモリ上に行を保持するシート
///
/// 行は常に行番号の昇順で保持されます。同じ行番号の行を追加した場合は置き換えられます。
///
/// # 使用例
///
/// ```rust
/// use expense_sheet::{CellValue, MemorySheet};
///
/// let sheet = MemorySheet::from_rows(vec![
///     vec![CellValue::from("Date"), CellValue::from("Amount")],
///     vec![CellValue::from("2024-01-01"), CellValue::from(12.5)],
/// ]);
/// assert_eq!(sheet.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    rows: Vec<SheetRow>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 稠密な行データからシートを構築
    ///
    /// 外側の要素が行番号0から、内側の要素が列位置0からの順に対応します。
    /// すべてのセルが格納済みとして扱われます。
    pub fn from_rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = CellValue>,
    {
        let mut sheet = Self::new();
        for (row_idx, cells) in rows.into_iter().enumerate() {
            let mut row = SheetRow::new(row_idx as u32);
            for (col_idx, value) in cells.into_iter().enumerate() {
                row.set_cell(col_idx as u32, value);
            }
            sheet.push_row(row);
        }
        sheet
    }

    /// 行を追加する
    pub fn push_row(&mut self, row: SheetRow) {
        match self.rows.binary_search_by_key(&row.index(), SheetRow::index) {
            Ok(pos) => self.rows[pos] = row,
            Err(pos) => self.rows.insert(pos, row),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Sheet for MemorySheet {
    fn rows(&self) -> impl Iterator<Item = Result<SheetRow, ImportError>> + '_ {
        self.rows.iter().cloned().map(Ok)
    }
}
