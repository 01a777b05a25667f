//! Workbook Module
//!
//! calamineのラッパーとして、ワークブックを開き最初のワークシートを読み込む。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::collections::BTreeSet;
use std::io::{Cursor, Read, Seek};

use super::metadata::XlsxMetadataParser;
use crate::error::ImportError;
use crate::grid::Sheet;
use crate::security::{read_limited, SecurityConfig};
use crate::types::{CellValue, SheetRow};

/// ワークブックパーサー
///
/// 形式は自動判別されます（`.xls`、`.xlsx`、`.xlsb`、`.ods`）。
pub(crate) struct WorkbookParser {
    sheets: Sheets<Cursor<Vec<u8>>>,
    format: SourceFormat,
    /// 最初のワークシートの空白セル（XLSXのみ）
    blank_cells: Option<BTreeSet<(u32, u32)>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// 入力全体を上限付きでメモリに読み込んでから解析します。
    /// `reader`はこの呼び出しの中でのみ使用されます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(ImportError)` - 読み込み・解析に失敗した場合、または入力が上限を超えた場合
    pub fn open<R: Read>(reader: R, security: &SecurityConfig) -> Result<Self, ImportError> {
        let buffer = read_limited(reader, security.max_input_file_size)?;
        let size = buffer.len();

        // calamineの解析エラーを優先して報告する
        let blank_scan = XlsxMetadataParser::first_sheet_blank_cells(&buffer);
        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer)).map_err(ImportError::Parse)?;
        let format = SourceFormat::of(&sheets);
        let blank_cells = match format {
            SourceFormat::Xlsx => Some(blank_scan?.unwrap_or_default()),
            _ => None,
        };
        log::info!(
            "Opened {:?} workbook ({} bytes, {} sheet(s))",
            format,
            size,
            sheets.sheet_names().len()
        );

        Ok(Self {
            sheets,
            format,
            blank_cells,
        })
    }

    /// 最初のワークシートを読み込む
    ///
    /// 値の範囲と数式の範囲を1回だけ取得し、以降のセル参照で再利用します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookSheet)` - 最初のワークシート
    /// * `Err(ImportError::NoWorksheet)` - ワークシートが存在しない場合
    /// * `Err(ImportError::Parse)` - ワークシートの解析に失敗した場合
    pub fn first_sheet(&mut self) -> Result<WorkbookSheet, ImportError> {
        let name = self
            .sheets
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ImportError::NoWorksheet)?;

        let values = self
            .sheets
            .worksheet_range_at(0)
            .ok_or(ImportError::NoWorksheet)??;

        // 数式を取得できない形式では、キャッシュ値だけで判定する
        let formulas = match self.sheets.worksheet_formula(&name) {
            Ok(range) => Some(range),
            Err(e) => {
                log::warn!("Formulas of sheet '{}' are unavailable: {}", name, e);
                None
            }
        };

        for limitation in self.format.limitations() {
            log::warn!("Sheet '{}' ({:?}): {}", name, self.format, limitation);
        }

        let blanks = self.blank_cells.take().unwrap_or_default();
        log::debug!(
            "Loaded sheet '{}' (start: {:?}, end: {:?}, blank cells: {})",
            name,
            values.start(),
            values.end(),
            blanks.len()
        );

        Ok(WorkbookSheet {
            values,
            formulas,
            blanks,
        })
    }
}

/// 自動判別されたワークブックの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Xls,
    Xlsx,
    Xlsb,
    Ods,
}

impl SourceFormat {
    fn of<RS: Read + Seek>(sheets: &Sheets<RS>) -> Self {
        match sheets {
            Sheets::Xls(_) => SourceFormat::Xls,
            Sheets::Xlsx(_) => SourceFormat::Xlsx,
            Sheets::Xlsb(_) => SourceFormat::Xlsb,
            Sheets::Ods(_) => SourceFormat::Ods,
        }
    }

    /// この形式で区別できないセルの種類
    ///
    /// calamineは書式だけを持つ空白セルを公開しないため、XLSX以外では空白セルが
    /// 未格納として読まれます。`.xls`の共有数式・配列数式は数式文字列が空になるため、
    /// キャッシュ値として読まれます。
    fn limitations(self) -> &'static [&'static str] {
        match self {
            SourceFormat::Xlsx => &[],
            SourceFormat::Xls => &[
                "blank cells cannot be distinguished from absent cells",
                "shared and array formulas are read as their cached values",
            ],
            SourceFormat::Xlsb | SourceFormat::Ods => {
                &["blank cells cannot be distinguished from absent cells"]
            }
        }
    }
}

/// ワークブックから読み込んだワークシート
///
/// 行番号・列位置は使用範囲の原点に依存しない絶対位置（0始まり）です。
/// 値・数式・空白セルのいずれも持たない行は格納されていないものとして扱われます。
#[derive(Debug, Clone)]
pub struct WorkbookSheet {
    values: Range<Data>,
    formulas: Option<Range<String>>,
    blanks: BTreeSet<(u32, u32)>,
}

impl WorkbookSheet {
    /// 値・数式・空白セルを合わせた範囲（開始, 終了）
    fn bounds(&self) -> Option<((u32, u32), (u32, u32))> {
        let value_bounds = self.values.start().zip(self.values.end());
        let formula_bounds = self
            .formulas
            .as_ref()
            .and_then(|f| f.start().zip(f.end()));
        let blank_bounds = self.blanks.iter().map(|&position| (position, position));

        value_bounds
            .into_iter()
            .chain(formula_bounds)
            .chain(blank_bounds)
            .reduce(|a, b| {
                (
                    (a.0 .0.min(b.0 .0), a.0 .1.min(b.0 .1)),
                    (a.1 .0.max(b.1 .0), a.1 .1.max(b.1 .1)),
                )
            })
    }

    /// 指定位置のセルを取得（格納されていない場合は`None`）
    fn cell_at(&self, position: (u32, u32)) -> Option<CellValue> {
        if let Some(formula) = self
            .formulas
            .as_ref()
            .and_then(|f| f.get_value(position))
            .filter(|f| !f.is_empty())
        {
            return Some(CellValue::Formula(formula.clone()));
        }

        self.values
            .get_value(position)
            .and_then(convert_data)
            .or_else(|| self.blanks.contains(&position).then_some(CellValue::Blank))
    }

    fn row_at(&self, row: u32, first_col: u32, last_col: u32) -> Option<SheetRow> {
        let mut sheet_row = SheetRow::new(row);
        for col in first_col..=last_col {
            if let Some(value) = self.cell_at((row, col)) {
                sheet_row.set_cell(col, value);
            }
        }

        if sheet_row.physical_cell_count() == 0 {
            None
        } else {
            Some(sheet_row)
        }
    }
}

impl Sheet for WorkbookSheet {
    fn rows(&self) -> impl Iterator<Item = Result<SheetRow, ImportError>> + '_ {
        self.bounds()
            .into_iter()
            .flat_map(move |((first_row, first_col), (last_row, last_col))| {
                (first_row..=last_row).filter_map(move |row| self.row_at(row, first_col, last_col))
            })
            .map(Ok)
    }
}

/// calamineのセルデータを変換
///
/// 日時セルは、旧形式の数値セルと同じくシリアル値の数値として扱います。
fn convert_data(data: &Data) -> Option<CellValue> {
    let value = match data {
        Data::Empty => return None,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::DateTimeIso(_) => CellValue::Other("datetime-iso".to_string()),
        Data::DurationIso(_) => CellValue::Other("duration-iso".to_string()),
    };
    Some(value)
}
