//! Boundary Tests for expense-sheet
//!
//! 空のシート、ヘッダーのみのシート、壊れたファイルなどの境界条件を検証します。

use expense_sheet::{
    CellKind, CellTypeError, ConversionError, ExpenseReaderBuilder, FieldRow, ImportError,
    RowDiagnostic, RowError,
};
use rust_xlsxwriter::*;
use std::io::Cursor;

// Helper module for generating boundary test fixtures
mod fixtures {
    use super::*;

    /// Generate a workbook with an empty sheet (no cells)
    pub fn generate_empty_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("EmptySheet")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a workbook with only a header row
    pub fn generate_header_only() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Date")?;
        worksheet.write_string(0, 1, "Amount")?;
        worksheet.write_string(0, 2, "Note")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a sheet whose header is a single cell but data rows are wide
    pub fn generate_narrow_header() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Date")?;
        for row in 1..=5 {
            worksheet.write_string(row, 0, &format!("2024-05-0{}", row))?;
            worksheet.write_number(row, 1, row as f64)?;
            worksheet.write_formula(row, 2, "=B2")?;
        }
        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a sheet with formatted but empty cells inside the header width
    pub fn generate_formatted_blanks() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let bold = Format::new().set_bold();
        worksheet.write_string(0, 0, "Date")?;
        worksheet.write_string(0, 1, "Amount")?;
        worksheet.write_string(1, 0, "2024-06-01")?;
        worksheet.write_blank(1, 1, &bold)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a sheet whose header has a formatted blank cell between two labels
    pub fn generate_blank_in_header() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let bold = Format::new().set_bold();
        worksheet.write_string(0, 0, "Date")?;
        worksheet.write_blank(0, 1, &bold)?;
        worksheet.write_string(0, 2, "Note")?;
        worksheet.write_string(1, 0, "2024-06-01")?;
        worksheet.write_blank(1, 1, &bold)?;
        worksheet.write_string(1, 2, "x")?;
        worksheet.write_string(2, 0, "2024-06-02")?;
        worksheet.write_number(2, 1, 3.0)?;
        worksheet.write_string(2, 2, "y")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Generate many rows with a failure every tenth row
    pub fn generate_many_rows(rows: u32) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Index")?;
        worksheet.write_string(0, 1, "Amount")?;
        for row in 1..=rows {
            worksheet.write_number(row, 0, row as f64)?;
            if row % 10 == 0 {
                worksheet.write_formula(row, 1, "=A1")?;
            } else {
                worksheet.write_number(row, 1, row as f64 * 1.5)?;
            }
        }
        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a corrupted file (invalid ZIP structure)
    pub fn generate_corrupted_file() -> Vec<u8> {
        vec![0x50, 0x4B, 0x03, 0x04, 0xFF, 0xFF, 0xFF, 0xFF]
    }
}

fn passthrough(fields: FieldRow) -> Result<FieldRow, ConversionError> {
    Ok(fields)
}

fn read(data: Vec<u8>) -> (Result<Vec<FieldRow>, ImportError>, Vec<RowDiagnostic>) {
    let reader = ExpenseReaderBuilder::new().build().unwrap();
    let mut diagnostics: Vec<RowDiagnostic> = Vec::new();
    let result = reader.read(Cursor::new(data), passthrough, &mut diagnostics);
    (result, diagnostics)
}

#[test]
fn test_empty_sheet() {
    let (result, diagnostics) = read(fixtures::generate_empty_sheet().unwrap());

    assert!(result.unwrap().is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_header_only() {
    let (result, diagnostics) = read(fixtures::generate_header_only().unwrap());

    assert!(result.unwrap().is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_narrow_header_truncates_every_row() {
    let (result, diagnostics) = read(fixtures::generate_narrow_header().unwrap());

    let records = result.unwrap();
    assert_eq!(records.len(), 5);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.len(), 1);
        assert_eq!(record.get(0), Some(format!("2024-05-0{}", i + 1).as_str()));
    }
    // 数式セルはヘッダー幅の外にあるため読まれない
    assert!(diagnostics.is_empty());
}

fn assert_blank_at(diagnostic: &RowDiagnostic, row: u32, position: u32) {
    assert_eq!(diagnostic.row, row);
    assert_eq!(
        diagnostic.error,
        RowError::Cell {
            position,
            source: CellTypeError::new(CellKind::Blank),
        }
    );
}

#[test]
fn test_formatted_blank_cell_drops_row() {
    let (result, diagnostics) = read(fixtures::generate_formatted_blanks().unwrap());

    assert!(result.unwrap().is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_blank_at(&diagnostics[0], 1, 1);
}

#[test]
fn test_formatted_blank_header_cell_counts_toward_width() {
    let (result, diagnostics) = read(fixtures::generate_blank_in_header().unwrap());

    let records = result.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].as_slice(),
        &[
            Some("2024-06-02".to_string()),
            Some("3.0".to_string()),
            Some("y".to_string())
        ]
    );
    assert_eq!(diagnostics.len(), 1);
    assert_blank_at(&diagnostics[0], 1, 1);
}

#[test]
fn test_many_rows_isolate_failures() {
    let (result, diagnostics) = read(fixtures::generate_many_rows(500).unwrap());

    let records = result.unwrap();
    assert_eq!(records.len(), 450);
    assert_eq!(diagnostics.len(), 50);
    assert!(diagnostics.iter().all(|d| d.row % 10 == 0));
    assert!(diagnostics.iter().all(|d| d.error.cell_position() == Some(1)));
    // 出力は行番号順
    assert_eq!(records[0].get(0), Some("1.0"));
    assert_eq!(records[449].get(0), Some("499.0"));
}

#[test]
fn test_corrupted_file() {
    let (result, diagnostics) = read(fixtures::generate_corrupted_file());

    assert!(result.is_err());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_empty_input() {
    let (result, _) = read(Vec::new());

    assert!(result.is_err());
}
