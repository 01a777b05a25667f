//! Security Tests
//!
//! 入力サイズの制限と、不正な入力に対する致命的エラーの扱いを検証します。

use expense_sheet::{ConversionError, ExpenseReaderBuilder, FieldRow, ImportError, RowDiagnostic};
use rust_xlsxwriter::*;
use std::io::Cursor;

fn passthrough(fields: FieldRow) -> Result<FieldRow, ConversionError> {
    Ok(fields)
}

fn small_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Date").unwrap();
    worksheet.write_string(1, 0, "2024-01-01").unwrap();
    workbook.save_to_buffer().unwrap()
}

/// 入力サイズの上限を超えたファイルは読み込まない
#[test]
fn test_input_size_limit_exceeded() {
    let data = small_workbook();
    let reader = ExpenseReaderBuilder::new()
        .with_max_input_size(data.len() as u64 - 1)
        .build()
        .unwrap();
    let mut diagnostics: Vec<RowDiagnostic> = Vec::new();

    let result = reader.read(Cursor::new(data), passthrough, &mut diagnostics);

    match result {
        Err(ImportError::SecurityViolation(msg)) => {
            assert!(msg.contains("exceeds maximum"));
        }
        e => panic!("Unexpected result: {:?}", e),
    }
    assert!(diagnostics.is_empty());
}

/// 上限ちょうどのファイルは読み込める
#[test]
fn test_input_size_limit_exact() {
    let data = small_workbook();
    let reader = ExpenseReaderBuilder::new()
        .with_max_input_size(data.len() as u64)
        .build()
        .unwrap();

    let records = reader
        .read(Cursor::new(data), passthrough, Vec::<RowDiagnostic>::new())
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get(0), Some("2024-01-01"));
}

/// ZIPでもOLEでもない入力は解析エラーになる
#[test]
fn test_plain_text_is_parse_error() {
    let reader = ExpenseReaderBuilder::new().build().unwrap();

    let result = reader.read(
        Cursor::new(b"Date,Amount\n2024-01-01,12.5\n".to_vec()),
        passthrough,
        Vec::<RowDiagnostic>::new(),
    );

    assert!(matches!(result, Err(ImportError::Parse(_))));
}

/// 上限0の設定は構築時に拒否される
#[test]
fn test_zero_limit_is_rejected() {
    let result = ExpenseReaderBuilder::new().with_max_input_size(0).build();

    assert!(matches!(result, Err(ImportError::Config(_))));
}
