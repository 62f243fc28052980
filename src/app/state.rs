// ==========================================
// B2B 交易平台 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 所有 API 共享同一个 SQLite 连接
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{ActionLogApi, CurrencyApi, ExportApi, ImportApi, ModerationApi};
use crate::config::{AppConfig, ConfigManager, ImportConfigReader};
use crate::currency::{
    Clock, CurrencyConverter, ExchangeRateHostProvider, RateProvider, RateStore, SharedConverter,
    SqliteRateStore, SystemClock,
};
use crate::db::{init_schema, open_sqlite_connection};

/// 应用状态
///
/// 包含所有API实例和共享资源，以 Arc<AppState> 注入 axum 路由
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享数据库连接
    pub conn: Arc<Mutex<Connection>>,

    /// JWT 签名密钥（HS256）
    pub jwt_secret: String,

    /// 批量导入API
    pub import_api: Arc<ImportApi>,

    /// 导出 / 模板API
    pub export_api: Arc<ExportApi>,

    /// 审核API
    pub moderation_api: Arc<ModerationApi>,

    /// 汇率API
    pub currency_api: Arc<CurrencyApi>,

    /// 操作日志API
    pub action_log_api: Arc<ActionLogApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - config: 应用配置
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并初始化 schema
    /// 2. 创建汇率转换器（SQLite 缓存 + 远程接口 + 系统时钟）
    /// 3. 创建所有API实例
    pub fn new(config: &AppConfig) -> Result<Self, String> {
        let db_path = resolve_db_path(&config.database.path);
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let store: Arc<dyn RateStore> = Arc::new(
            SqliteRateStore::new(conn.clone(), config.currency.cache_ttl_secs)
                .map_err(|e| format!("汇率缓存配置无效: {}", e))?,
        );
        let provider: Arc<dyn RateProvider> = Arc::new(
            ExchangeRateHostProvider::new(&config.currency)
                .map_err(|e| format!("无法创建汇率客户端: {}", e))?,
        );
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let converter = CurrencyConverter::new(store, provider, clock);

        let config_reader: Arc<dyn ImportConfigReader> = Arc::new(ConfigManager::from_connection(
            conn.clone(),
            config.import.clone(),
        ));

        Ok(Self::from_parts(
            db_path,
            conn,
            config.jwt_secret(),
            config_reader,
            converter,
        ))
    }

    /// 由已创建的组件组装（测试中注入内存数据库与假汇率源）
    pub fn from_parts(
        db_path: String,
        conn: Arc<Mutex<Connection>>,
        jwt_secret: String,
        config_reader: Arc<dyn ImportConfigReader>,
        converter: SharedConverter,
    ) -> Self {
        Self {
            db_path,
            jwt_secret,
            import_api: Arc::new(ImportApi::new(conn.clone(), config_reader)),
            export_api: Arc::new(ExportApi::new(conn.clone())),
            moderation_api: Arc::new(ModerationApi::new(conn.clone())),
            currency_api: Arc::new(CurrencyApi::new(Arc::new(converter))),
            action_log_api: Arc::new(ActionLogApi::new(conn.clone())),
            conn,
        }
    }
}

/// 解析数据库路径
///
/// - 配置为空: 使用默认路径
/// - 相对路径: 相对于可执行文件所在目录
pub fn resolve_db_path(configured: &str) -> String {
    let trimmed = configured.trim();
    if trimmed.is_empty() {
        return get_default_db_path();
    }

    let path = PathBuf::from(trimmed);
    if path.is_absolute() {
        return trimmed.to_string();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&path)))
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 B2B_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("B2B_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./b2b_marketplace.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("b2b-marketplace-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("b2b-marketplace");

        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("b2b_marketplace.db");
        }
    }

    path.to_string_lossy().to_string()
}
