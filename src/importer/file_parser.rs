// ==========================================
// B2B 交易平台 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls)，读取第一个工作表
// 第一行为表头，行号与表格中显示的一致（表头 = 第 1 行）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::Path;

/// 允许上传的扩展名
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// 一行原始数据（按列下标存放，已 TRIM）
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// 解析后的工作表
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 校验文件扩展名（忽略大小写）
    pub fn check_extension(&self, file_name: &str) -> ImportResult<()> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(())
        } else if ext.is_empty() {
            Err(ImportError::UnsupportedFormat(file_name.to_string()))
        } else {
            Err(ImportError::UnsupportedFormat(format!(".{}", ext)))
        }
    }

    /// 解析上传的文件内容
    ///
    /// # 参数
    /// - file_name: 原始文件名（用于扩展名校验）
    /// - bytes: 文件内容
    pub fn parse_bytes(&self, file_name: &str, bytes: &[u8]) -> ImportResult<RawSheet> {
        self.check_extension(file_name)?;

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => return Err(ImportError::EmptySheet),
        };

        self.parse_range(&range)
    }

    /// 解析磁盘上的文件
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> ImportResult<RawSheet> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| ImportError::ExcelParseError(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.parse_bytes(file_name, &bytes)
    }

    fn parse_range(&self, range: &Range<Data>) -> ImportResult<RawSheet> {
        // 表头所在的表格行（0 基）
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

        let mut rows = range.rows();
        let header_row = rows.next().ok_or(ImportError::EmptySheet)?;
        let headers: Vec<String> = header_row.iter().map(cell_text).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptySheet);
        }

        let mut records = Vec::new();
        for (idx, data_row) in rows.enumerate() {
            let cells: Vec<String> = data_row.iter().map(cell_text).collect();

            // 跳过完全空白的行
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRow {
                row_number: first_row + idx + 2,
                cells,
            });
        }

        Ok(RawSheet {
            headers,
            rows: records,
        })
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}
