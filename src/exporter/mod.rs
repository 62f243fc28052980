// ==========================================
// B2B 交易平台 - 导出层
// ==========================================
// 职责: 公司 / 商品 / 分类导出为 xlsx，以及导入模板
// ==========================================

pub mod exports;
pub mod templates;
pub mod xlsx_writer;

pub use exports::Exporter;
pub use templates::{category_template, company_template, product_template, INSTRUCTIONS_SHEET};
pub use xlsx_writer::{write_workbook, CellValue, ExportError, ExportResult, SheetData};
