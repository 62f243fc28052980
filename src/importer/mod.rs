// ==========================================
// B2B 交易平台 - 导入层
// ==========================================
// 职责: Excel 批量导入（公司 / 商品 / 分类）
// 流程: 文件解析 → 表头映射 → 逐行清洗/匹配/关联解析 → 写入 → 汇总报告
// ==========================================

// 模块声明
pub mod category_resource;
pub mod company_resource;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_engine;
pub mod product_resource;
pub mod related;
pub mod report;
pub mod resource;

// 重导出核心类型
pub use category_resource::{CategoryResource, CATEGORY_COLUMNS};
pub use company_resource::{CompanyResource, COMPANY_COLUMNS};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult, RelatedEntity};
pub use field_mapper::{ColumnMap, ColumnSpec, RowReader};
pub use file_parser::{ExcelParser, RawRow, RawSheet};
pub use import_engine::ImportEngine;
pub use product_resource::{ProductResource, PRODUCT_COLUMNS};
pub use related::RelatedResolver;
pub use report::{ImportReport, RowOutcome};
pub use resource::{ImportContext, ImportOptions, ImportResource};
