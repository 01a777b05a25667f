//! Metadata Parser Module
//!
//! XLSXファイル（ZIPアーカイブ）のXMLを直接解析し、calamineが公開しない情報を取得する。
//! 値を持たない格納セル（書式だけが設定された空白セル）の位置を収集します。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{BTreeSet, HashMap};
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

use crate::error::ImportError;

const WORKBOOK_PATH: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PATH: &str = "xl/_rels/workbook.xml.rels";

/// XLSXメタデータパーサー
pub(crate) struct XlsxMetadataParser;

impl XlsxMetadataParser {
    /// 最初のワークシートの空白セルの位置を収集
    ///
    /// # 戻り値
    ///
    /// * `Ok(Some(BTreeSet))` - 空白セルの位置（行, 列）（0始まり）
    /// * `Ok(None)` - 入力がXLSXパッケージではない場合（`.xls`、`.xlsb`、`.ods`など）
    /// * `Err(ImportError)` - XLSXパッケージの解析に失敗した場合
    pub fn first_sheet_blank_cells(data: &[u8]) -> Result<Option<BTreeSet<(u32, u32)>>, ImportError> {
        let Ok(mut archive) = ZipArchive::new(Cursor::new(data)) else {
            return Ok(None);
        };
        if archive.by_name(WORKBOOK_PATH).is_err() {
            return Ok(None);
        }

        let workbook_xml = read_entry(&mut archive, WORKBOOK_PATH)?;
        let Some(rel_id) = parse_first_sheet_rel_id(&workbook_xml)? else {
            return Ok(Some(BTreeSet::new()));
        };

        let rels_xml = read_entry(&mut archive, WORKBOOK_RELS_PATH)?;
        let relationships = parse_relationships(&rels_xml)?;
        let target = relationships.get(&rel_id).ok_or_else(|| {
            ImportError::Xml(format!("Relationship '{}' not found in workbook", rel_id))
        })?;

        let sheet_path = resolve_target(target);
        let sheet_xml = read_entry(&mut archive, &sheet_path)?;
        let blanks = parse_blank_cells(&sheet_xml)?;
        log::debug!("Found {} blank cell(s) in {}", blanks.len(), sheet_path);

        Ok(Some(blanks))
    }
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>, ImportError> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| ImportError::Zip(format!("{}: {}", name, e)))?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(content)
}

fn xml_error(e: impl std::fmt::Display) -> ImportError {
    ImportError::Xml(e.to_string())
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, ImportError> {
    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        if attr.key.as_ref() == key {
            let value = std::str::from_utf8(&attr.value).map_err(xml_error)?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

/// workbook.xml から最初の`<sheet>`のリレーションシップIDを取得
fn parse_first_sheet_rel_id(xml: &[u8]) -> Result<Option<String>, ImportError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                return attribute(&e, b"r:id");
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }
}

/// リレーションシップファイルを解析（Id → Target）
fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, ImportError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut relationships = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attribute(&e, b"Id")?, attribute(&e, b"Target")?) {
                    relationships.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// リレーションシップのターゲットをアーカイブ内のパスに変換
///
/// `worksheets/sheet1.xml` は `xl/` からの相対パス、`/xl/worksheets/sheet1.xml` は絶対パス。
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

/// ワークシートXMLから値を持たない`<c>`要素の位置を収集
///
/// `<v>`、`<is>`、`<f>`のいずれも持たないセルを空白セルとみなします。
/// `r`属性のないセルは、同じ行の直前のセルの次の列に置かれます。
fn parse_blank_cells(xml: &[u8]) -> Result<BTreeSet<(u32, u32)>, ImportError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut blanks = BTreeSet::new();

    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;
    let mut open_cell: Option<(u32, u32)> = None;
    let mut has_value = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_number(&e, current_row)?;
                    next_col = 0;
                }
                b"c" => {
                    open_cell = Some(cell_position(&e, current_row, next_col)?);
                    has_value = false;
                }
                b"v" | b"is" | b"f" => has_value = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => current_row = row_number(&e, current_row)? + 1,
                b"c" => {
                    let position = cell_position(&e, current_row, next_col)?;
                    blanks.insert(position);
                    next_col = position.1 + 1;
                }
                b"v" | b"is" | b"f" => has_value = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(position) = open_cell.take() {
                        if !has_value {
                            blanks.insert(position);
                        }
                        next_col = position.1 + 1;
                    }
                }
                b"row" => current_row += 1,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(blanks)
}

/// `<row r="..">` の行番号（0始まり）。`r`がなければ`default`
fn row_number(e: &BytesStart<'_>, default: u32) -> Result<u32, ImportError> {
    match attribute(e, b"r")? {
        Some(r) => r
            .parse::<u32>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| ImportError::Xml(format!("Invalid row number: {}", r))),
        None => Ok(default),
    }
}

fn cell_position(e: &BytesStart<'_>, row: u32, next_col: u32) -> Result<(u32, u32), ImportError> {
    match attribute(e, b"r")? {
        Some(r) => {
            parse_cell_ref(&r).ok_or_else(|| ImportError::Xml(format!("Invalid cell reference: {}", r)))
        }
        None => Ok((row, next_col)),
    }
}

/// セル参照文字列を座標に変換（例: "A1" -> (0, 0)、"AA10" -> (9, 26)）
fn parse_cell_ref(ref_str: &str) -> Option<(u32, u32)> {
    let split = ref_str.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = ref_str.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let val = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        col = col.checked_mul(26)?.checked_add(val)?;
    }

    let row = digits.parse::<u32>().ok()?.checked_sub(1)?;
    Some((row, col - 1))
}
