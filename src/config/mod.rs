// ==========================================
// B2B 交易平台 - 配置层
// ==========================================
// 职责: 系统配置管理，支持多级覆写
// 优先级: 单次请求参数 > config_kv 表 > config.toml > 内置默认值
// ==========================================

pub mod app_config;
pub mod config_manager;
pub mod import_config_trait;

// 重导出
pub use app_config::{load_config, AppConfig, CurrencySettings, ImportSettings};
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::ImportConfigReader;
