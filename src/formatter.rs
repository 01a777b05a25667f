//! Formatter Module
//!
//! セル値をフィールド文字列へ変換するモジュール。
//! 文字列・論理値・数値のみを受け付け、それ以外の種類は分類エラーとします。

use crate::error::CellTypeError;
use crate::types::CellValue;

/// フィールドフォーマッター
///
/// 1セル分の変換処理のファサードとして機能します。
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FieldFormatter {
    number_formatter: NumberFormatter,
}

impl FieldFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// セルをフィールド値へ変換
    ///
    /// # 引数
    ///
    /// * `cell` - 行から取得したセル（`None`は absent）
    ///
    /// # 戻り値
    ///
    /// * `Ok(Some(String))` - 文字列・論理値・数値セルの文字列表現
    /// * `Ok(None)` - absent セル
    /// * `Err(CellTypeError)` - 空白・数式・エラー値などのセル
    pub fn format_field(&self, cell: Option<&CellValue>) -> Result<Option<String>, CellTypeError> {
        let Some(value) = cell else {
            return Ok(None);
        };

        match value {
            CellValue::String(s) => Ok(Some(s.clone())),
            CellValue::Bool(b) => Ok(Some(b.to_string())),
            CellValue::Number(n) => Ok(Some(self.number_formatter.format(*n))),
            CellValue::Blank
            | CellValue::Formula(_)
            | CellValue::Error(_)
            | CellValue::Other(_) => Err(CellTypeError::new(value.kind())),
        }
    }
}

/// 数値フォーマッター
///
/// ロケールに依存しない10進表現を出力します。指数表記は使わず、整数値にも
/// 小数部を付けます（`12.5` → `"12.5"`、`3.0` → `"3.0"`、`45292.0` → `"45292.0"`）。
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    pub fn format(&self, value: f64) -> String {
        let text = value.to_string();
        if value.is_finite() && value.fract() == 0.0 {
            text + ".0"
        } else {
            text
        }
    }
}
