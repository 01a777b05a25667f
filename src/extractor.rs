//! Extractor Module
//!
//! シートの各データ行を経費エンティティへ変換するモジュール。
//!
//! 行0はヘッダーとして扱い、その物理セル数をヘッダー幅として以降のすべての行に適用します。
//! セルの分類エラーやファクトリの拒否は、その行だけを無効にし、取り込みは継続します。
//! シートの読み込み失敗（I/Oエラーなど）は取り込み全体を中断します。

use crate::api::{DiagnosticSink, ExpenseFactory};
use crate::error::{CellTypeError, ImportError, RowError};
use crate::formatter::FieldFormatter;
use crate::grid::Sheet;
use crate::types::{CellValue, FieldRow, RowDiagnostic, SheetRow};

/// ヘッダー行の行番号
const HEADER_ROW: u32 = 0;

/// 行抽出器
///
/// [`ExpenseFactory`]と[`DiagnosticSink`]を受け取り、シートを1回の走査で変換します。
/// 呼び出しごとに独立しており、行の間で共有される可変状態はヘッダー幅だけです。
///
/// # 使用例
///
/// ```rust
/// use expense_sheet::{
///     CellValue, ConversionError, FieldRow, MemorySheet, RowDiagnostic, RowExtractor,
/// };
///
/// # fn main() -> Result<(), expense_sheet::ImportError> {
/// let sheet = MemorySheet::from_rows(vec![
///     vec![CellValue::from("Date"), CellValue::from("Amount"), CellValue::from("Note")],
///     vec![CellValue::from("2024-01-01"), CellValue::from(12.5), CellValue::from("Taxi")],
///     vec![
///         CellValue::from("2024-01-02"),
///         CellValue::Formula("B2*2".to_string()),
///         CellValue::from("Lunch"),
///     ],
/// ]);
///
/// let factory = |fields: FieldRow| -> Result<FieldRow, ConversionError> { Ok(fields) };
/// let mut diagnostics: Vec<RowDiagnostic> = Vec::new();
///
/// let records = RowExtractor::new(factory, &mut diagnostics).extract(&sheet)?;
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].get(1), Some("12.5"));
/// assert_eq!(diagnostics[0].row, 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RowExtractor<F, D> {
    factory: F,
    sink: D,
    formatter: FieldFormatter,
}

impl<F, D> RowExtractor<F, D>
where
    F: ExpenseFactory,
    D: DiagnosticSink,
{
    pub fn new(factory: F, sink: D) -> Self {
        Self {
            factory,
            sink,
            formatter: FieldFormatter::new(),
        }
    }

    /// シートを変換し、成功した行のエンティティを行番号順に返す
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<F::Expense>)` - 変換に成功したエンティティ（スキップされた行は含まない）
    /// * `Err(ImportError)` - シートの読み込みに失敗した場合
    pub fn extract<S: Sheet>(&mut self, sheet: &S) -> Result<Vec<F::Expense>, ImportError> {
        let mut expenses = Vec::new();
        let mut header_width: u32 = 0;
        let mut header_seen = false;
        let mut skipped = 0usize;

        for row in sheet.rows() {
            let row = row?;

            if row.index() == HEADER_ROW {
                header_width = row.physical_cell_count() as u32;
                header_seen = true;
                log::debug!("Header row has {} cells", header_width);
                continue;
            }

            if !header_seen {
                log::debug!(
                    "No header row at index 0; row {} reads zero fields",
                    row.index()
                );
                header_seen = true;
            }

            match self.convert_row(&row, header_width) {
                Ok(expense) => expenses.push(expense),
                Err(error) => {
                    skipped += 1;
                    self.sink.report(RowDiagnostic::new(row.index(), error));
                }
            }
        }

        log::debug!(
            "Extracted {} expense(s), skipped {} row(s)",
            expenses.len(),
            skipped
        );
        Ok(expenses)
    }

    /// 1データ行を変換
    ///
    /// 最初に分類に失敗したセルで行の処理を打ち切ります。
    fn convert_row(&self, row: &SheetRow, header_width: u32) -> Result<F::Expense, RowError> {
        let fields = (0..header_width)
            .map(|position| {
                self.formatter
                    .format_field(row.cell(position))
                    .map_err(|source| RowError::Cell { position, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.factory.build(FieldRow::new(fields))?)
    }

    /// 1セル分の変換（`None`は absent セル）
    pub fn classify(&self, cell: Option<&CellValue>) -> Result<Option<String>, CellTypeError> {
        self.formatter.format_field(cell)
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn into_sink(self) -> D {
        self.sink
    }
}
