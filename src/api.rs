//! Public API Traits
//!
//! 取り込み処理が利用する外部コラボレーター（経費エンティティの生成、
//! 診断情報の出力先）のインターフェースを定義するモジュール。

use crate::error::ConversionError;
use crate::types::{FieldRow, RowDiagnostic};

/// 1行分のフィールドから経費エンティティを生成するファクトリ
///
/// エンティティの内部構造はファクトリが所有し、取り込み処理からは不透明です。
/// `build`が返すエラーは行単位のエラーとして扱われ、その行だけがスキップされます。
///
/// クロージャ`Fn(FieldRow) -> Result<T, ConversionError>`はそのままファクトリとして使えます。
///
/// # 使用例
///
/// ```rust
/// use expense_sheet::{ConversionError, ExpenseFactory, FieldRow};
///
/// struct Expense {
///     date: String,
///     amount: f64,
/// }
///
/// let factory = |fields: FieldRow| -> Result<Expense, ConversionError> {
///     let date = fields.get(0).ok_or_else(|| ConversionError::new("date is missing"))?;
///     let amount = fields
///         .get(1)
///         .and_then(|a| a.parse().ok())
///         .ok_or_else(|| ConversionError::new("amount is not a number"))?;
///     Ok(Expense { date: date.to_string(), amount })
/// };
///
/// let expense = factory
///     .build(FieldRow::new(vec![Some("2024-01-01".into()), Some("12.5".into())]))
///     .unwrap();
/// assert_eq!(expense.amount, 12.5);
/// ```
pub trait ExpenseFactory {
    /// 生成されるエンティティの型
    type Expense;

    /// フィールド列からエンティティを生成する
    fn build(&self, fields: FieldRow) -> Result<Self::Expense, ConversionError>;
}

impl<T, F> ExpenseFactory for F
where
    F: Fn(FieldRow) -> Result<T, ConversionError>,
{
    type Expense = T;

    fn build(&self, fields: FieldRow) -> Result<T, ConversionError> {
        self(fields)
    }
}

/// スキップされた行の診断情報の出力先
///
/// 取り込み処理は書き込むだけで、読み出すことはありません。
pub trait DiagnosticSink {
    /// スキップされた行を報告する
    fn report(&mut self, diagnostic: RowDiagnostic);
}

/// 診断情報をメモリ上に収集する
impl DiagnosticSink for Vec<RowDiagnostic> {
    fn report(&mut self, diagnostic: RowDiagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: RowDiagnostic) {
        (**self).report(diagnostic);
    }
}

/// `log`ファサードへ`error`レベルで出力する診断シンク
///
/// ロガーの初期化はアプリケーション側の責務です。
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: RowDiagnostic) {
        log::error!("Error in row {}: {}", diagnostic.row, diagnostic.error);
    }
}
