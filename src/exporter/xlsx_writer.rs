// ==========================================
// B2B 交易平台 - XLSX 写出
// ==========================================
// 表头加粗并冻结首行；空单元格不写入（导入时视为未填写）
// ==========================================

use rust_xlsxwriter::{Format, Workbook};
use thiserror::Error;

use crate::repository::error::RepositoryError;

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("读取数据失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error("生成 Excel 失败: {0}")]
    Xlsx(String),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Xlsx(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

/// 单元格值
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map(CellValue::Number).unwrap_or(CellValue::Empty)
    }
}

/// 一个工作表的内容
#[derive(Debug, Clone)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetData {
    pub fn new(name: &str, headers: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            headers,
            rows: Vec::new(),
        }
    }
}

/// 生成 xlsx 文件内容
pub fn write_workbook(sheets: &[SheetData]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        let mut widths: Vec<usize> = sheet.headers.iter().map(|h| h.chars().count()).collect();

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }

        for (idx, row) in sheet.rows.iter().enumerate() {
            let row_num = (idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    CellValue::Text(value) => {
                        worksheet.write_string(row_num, col as u16, value)?;
                        let longest = value.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                        if let Some(width) = widths.get_mut(col) {
                            *width = (*width).max(longest);
                        }
                    }
                    CellValue::Number(value) => {
                        worksheet.write_number(row_num, col as u16, *value)?;
                    }
                    CellValue::Empty => {}
                }
            }
        }

        for (col, width) in widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, (*width).clamp(8, 60) as f64 + 2.0)?;
        }
        if !sheet.headers.is_empty() {
            worksheet.set_freeze_panes(1, 0)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
