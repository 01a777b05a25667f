//! Security Module
//!
//! 入力サイズの制限を実装するモジュール。
//! ワークブックはメモリ上に全体を読み込んでから解析するため、読み込む量に上限を設けます。

use std::io::Read;

use crate::error::ImportError;

/// セキュリティ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

/// 上限付きで入力全体を読み込む
///
/// 上限を1バイトでも超える入力は読み切らずに拒否します。
///
/// # 戻り値
///
/// * `Ok(Vec<u8>)` - 読み込んだバイト列
/// * `Err(ImportError::SecurityViolation)` - 入力が上限を超えた場合
/// * `Err(ImportError::Io)` - 読み込みに失敗した場合
pub(crate) fn read_limited<R: Read>(reader: R, limit: u64) -> Result<Vec<u8>, ImportError> {
    let mut buffer = Vec::new();
    let bytes_read = reader.take(limit.saturating_add(1)).read_to_end(&mut buffer)?;

    if bytes_read as u64 > limit {
        return Err(ImportError::SecurityViolation(format!(
            "Input file size exceeds maximum: {} bytes",
            limit
        )));
    }

    Ok(buffer)
}
