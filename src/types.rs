//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::collections::BTreeMap;
use std::fmt;

use crate::error::RowError;

/// 格納されているセルの値を表す列挙型
///
/// 格納されていないセル（absent）はこの型では表現せず、
/// [`SheetRow::cell`]が`None`を返すことで表します。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 数値（f64）
    Number(f64),

    /// 格納されているが値を持たないセル
    Blank,

    /// 数式セル（数式の文字列）
    Formula(String),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 上記以外の値の種類（種類名）
    Other(String),
}

impl CellValue {
    /// 値の種類を取得
    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::String(_) => CellKind::String,
            CellValue::Bool(_) => CellKind::Boolean,
            CellValue::Number(_) => CellKind::Numeric,
            CellValue::Blank => CellKind::Blank,
            CellValue::Formula(_) => CellKind::Formula,
            CellValue::Error(_) => CellKind::Error,
            CellValue::Other(name) => CellKind::Other(name.clone()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// セルの値の種類
///
/// 診断メッセージでは小文字の名前で表示されます（例: `formula`）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    String,
    Boolean,
    Numeric,
    Blank,
    Formula,
    Error,
    /// 名前付きのその他の種類
    Other(String),
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::String => f.write_str("string"),
            CellKind::Boolean => f.write_str("boolean"),
            CellKind::Numeric => f.write_str("numeric"),
            CellKind::Blank => f.write_str("blank"),
            CellKind::Formula => f.write_str("formula"),
            CellKind::Error => f.write_str("error"),
            CellKind::Other(name) => f.write_str(name),
        }
    }
}

/// 格納されている1行
///
/// 行番号とセル位置はどちらも0始まりの絶対位置です。
/// セルは疎に保持され、格納されていない位置は absent として扱われます。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetRow {
    index: u32,
    cells: BTreeMap<u32, CellValue>,
}

impl SheetRow {
    /// セルを持たない行を生成
    pub fn new(index: u32) -> Self {
        Self {
            index,
            cells: BTreeMap::new(),
        }
    }

    /// セルを追加した行を返す（ビルダー形式）
    pub fn with_cell(mut self, position: u32, value: impl Into<CellValue>) -> Self {
        self.set_cell(position, value);
        self
    }

    /// セルを格納する（同じ位置の既存セルは置き換えられる）
    pub fn set_cell(&mut self, position: u32, value: impl Into<CellValue>) {
        self.cells.insert(position, value.into());
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// 格納されているセルの数（物理セル数）
    pub fn physical_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// 指定位置のセルを取得
    ///
    /// 格納されていない位置では`None`を返します。
    /// 空白セル（[`CellValue::Blank`]）は`None`にまとめられず、そのまま返されます。
    pub fn cell(&self, position: u32) -> Option<&CellValue> {
        self.cells.get(&position)
    }
}

/// 1データ行のフィールド列
///
/// ヘッダー幅と同じ長さを持ち、absent セルの位置は`None`になります。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldRow(Vec<Option<String>>);

impl FieldRow {
    pub fn new(fields: Vec<Option<String>>) -> Self {
        Self(fields)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 指定位置のフィールドを取得（範囲外または absent の場合は`None`）
    pub fn get(&self, position: usize) -> Option<&str> {
        self.0.get(position).and_then(|field| field.as_deref())
    }

    pub fn as_slice(&self) -> &[Option<String>] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Option<String>> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Option<String>> {
        self.0
    }
}

impl From<Vec<Option<String>>> for FieldRow {
    fn from(fields: Vec<Option<String>>) -> Self {
        Self(fields)
    }
}

impl IntoIterator for FieldRow {
    type Item = Option<String>;
    type IntoIter = std::vec::IntoIter<Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldRow {
    type Item = &'a Option<String>;
    type IntoIter = std::slice::Iter<'a, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// スキップされた行の診断情報
#[derive(Debug, Clone, PartialEq)]
pub struct RowDiagnostic {
    /// 行番号（0始まり）
    pub row: u32,
    /// 行を無効にしたエラー
    pub error: RowError,
}

impl RowDiagnostic {
    pub fn new(row: u32, error: RowError) -> Self {
        Self { row, error }
    }
}
