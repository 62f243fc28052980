// ==========================================
// B2B 交易平台 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取，缺省回落到 config.toml）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 外键未命中时是否自动创建占位记录
    ///
    /// # 默认值
    /// - false（需显式开启）
    async fn get_auto_create_related(&self) -> Result<bool, Box<dyn Error + Send + Sync>>;

    /// 返回结果中保留的错误条数上限
    ///
    /// # 默认值
    /// - 10
    async fn get_error_preview_limit(&self) -> Result<usize, Box<dyn Error + Send + Sync>>;
}
