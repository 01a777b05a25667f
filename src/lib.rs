//! expense-sheet - Row-isolated expense record extraction from spreadsheet files
//!
//! スプレッドシートの最初のワークシートから表形式の経費データを読み込み、
//! 各データ行を経費エンティティへ変換するクレートです。
//!
//! - 行0はヘッダーとして扱い、その物理セル数（ヘッダー幅）を以降のすべての行に適用します。
//! - 文字列・論理値・数値のセルはフィールド文字列に、格納されていないセルは`None`になります。
//! - 空白セル・数式セルなどを含む行や、ファクトリが拒否した行はスキップされ、
//!   診断シンクへ報告されます。取り込み自体は継続します。
//! - ファイルのオープンや解析の失敗は致命的なエラーとして呼び出し元へ返されます。
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use expense_sheet::{ConversionError, ExpenseReaderBuilder, FieldRow, LogSink};
//!
//! struct Expense {
//!     date: String,
//!     amount: f64,
//!     note: Option<String>,
//! }
//!
//! fn build_expense(fields: FieldRow) -> Result<Expense, ConversionError> {
//!     let date = fields
//!         .get(0)
//!         .ok_or_else(|| ConversionError::new("date is missing"))?;
//!     let amount = fields
//!         .get(1)
//!         .and_then(|a| a.parse().ok())
//!         .ok_or_else(|| ConversionError::new("amount is not a number"))?;
//!     Ok(Expense {
//!         date: date.to_string(),
//!         amount,
//!         note: fields.get(2).map(str::to_string),
//!     })
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let reader = ExpenseReaderBuilder::new().build()?;
//!
//!     // スキップされた行は log::error! で出力される
//!     let expenses = reader.read_path("expenses.xls", build_expense, LogSink)?;
//!
//!     for expense in &expenses {
//!         println!("{} {} {:?}", expense.date, expense.amount, expense.note);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Collecting Diagnostics
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use expense_sheet::{ConversionError, ExpenseReaderBuilder, FieldRow, RowDiagnostic};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = ExpenseReaderBuilder::new().build()?;
//! let data: Vec<u8> = vec![]; // Your spreadsheet bytes
//! let mut diagnostics: Vec<RowDiagnostic> = Vec::new();
//!
//! let rows = reader.read(
//!     Cursor::new(data),
//!     |fields: FieldRow| -> Result<FieldRow, ConversionError> { Ok(fields) },
//!     &mut diagnostics,
//! )?;
//!
//! for diagnostic in &diagnostics {
//!     eprintln!("row {} skipped: {}", diagnostic.row, diagnostic.error);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod error;
mod extractor;
mod formatter;
mod grid;
mod parser;
mod security;
mod types;

// 公開API
pub use api::{DiagnosticSink, ExpenseFactory, LogSink};
pub use builder::{ExpenseReader, ExpenseReaderBuilder};
pub use error::{CellTypeError, ConversionError, ImportError, RowError};
pub use extractor::RowExtractor;
pub use grid::{MemorySheet, Sheet};
pub use parser::WorkbookSheet;
pub use types::{CellKind, CellValue, FieldRow, RowDiagnostic, SheetRow};
