// ==========================================
// B2B 交易平台 - 核心库
// ==========================================
// 范围: 批量导入导出 / 审核 / 汇率换算 / 操作日志
// 技术栈: axum + Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ru");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - Excel 批量导入
pub mod importer;

// 导出层 - Excel 导出与导入模板
pub mod exporter;

// 审核层
pub mod moderation;

// 汇率与币种转换
pub mod currency;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 服务
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    ActionLog, Category, Company, CompanyStatus, Contacts, Currency, ModerationStatus, Product,
    Promotion, Review, SupplierType, Tender, User,
};

// 导入导出
pub use exporter::Exporter;
pub use importer::{ImportEngine, ImportOptions, ImportReport};

// API
pub use api::{ApiError, ApiResult, CurrencyApi, ExportApi, ImportApi, ModerationApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "B2B 交易平台";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
