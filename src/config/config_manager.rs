// ==========================================
// B2B 交易平台 - 配置管理器
// ==========================================
// 职责: 运行期配置查询与覆写
// 存储: config_kv 表 (key-value + scope)
// 缺省: 回落到 config.toml 中的 [import] 段
// ==========================================

use crate::config::app_config::ImportSettings;
use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    pub const IMPORT_AUTO_CREATE_RELATED: &str = "import.auto_create_related";
    pub const IMPORT_ERROR_PREVIEW_LIMIT: &str = "import.error_preview_limit";
}

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    defaults: ImportSettings,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - defaults: config.toml 中的导入配置（config_kv 无值时使用）
    pub fn new(db_path: &str, defaults: ImportSettings) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            defaults,
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>, defaults: ImportSettings) -> Self {
        Self { conn, defaults }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_auto_create_related(&self) -> ConfigResult<bool> {
        let value = self.get_config_value(config_keys::IMPORT_AUTO_CREATE_RELATED)?;
        Ok(match value.as_deref().map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "true" || v == "1" => true,
            Some(v) if v == "false" || v == "0" => false,
            Some(other) => {
                tracing::warn!(
                    config_key = config_keys::IMPORT_AUTO_CREATE_RELATED,
                    raw_value = %other,
                    "配置格式错误，使用默认值"
                );
                self.defaults.auto_create_related
            }
            None => self.defaults.auto_create_related,
        })
    }

    async fn get_error_preview_limit(&self) -> ConfigResult<usize> {
        let value = self.get_config_value(config_keys::IMPORT_ERROR_PREVIEW_LIMIT)?;
        Ok(value
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(self.defaults.error_preview_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)), ImportSettings::default())
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let manager = setup();
        assert!(!manager.get_auto_create_related().await.unwrap());
        assert_eq!(manager.get_error_preview_limit().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_overrides_from_config_kv() {
        let manager = setup();
        manager
            .set_global_config_value(config_keys::IMPORT_AUTO_CREATE_RELATED, "true")
            .unwrap();
        manager
            .set_global_config_value(config_keys::IMPORT_ERROR_PREVIEW_LIMIT, "3")
            .unwrap();

        assert!(manager.get_auto_create_related().await.unwrap());
        assert_eq!(manager.get_error_preview_limit().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_malformed_value_falls_back() {
        let manager = setup();
        manager
            .set_global_config_value(config_keys::IMPORT_AUTO_CREATE_RELATED, "maybe")
            .unwrap();
        assert!(!manager.get_auto_create_related().await.unwrap());
    }
}
