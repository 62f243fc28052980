// ==========================================
// B2B 交易平台 - 导入 API
// ==========================================
// 职责: 组装单次导入的运行参数并执行导入
// 参数优先级: 请求参数 (?auto_create / ?lang) > config_kv > config.toml
// 执行: rusqlite 为同步 API，导入在 spawn_blocking 中运行
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfigReader;
use crate::i18n::normalize_locale;
use crate::importer::{
    CategoryResource, CompanyResource, ImportEngine, ImportError, ImportOptions, ImportReport,
    ImportResource, ProductResource,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// 可导入 / 导出的资源类别（路径段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Companies,
    Products,
    Categories,
}

impl ResourceKind {
    pub fn from_path(segment: &str) -> ApiResult<Self> {
        match segment {
            "companies" => Ok(ResourceKind::Companies),
            "products" => Ok(ResourceKind::Products),
            "categories" => Ok(ResourceKind::Categories),
            other => Err(ApiError::NotFound(format!("未知资源: {}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Companies => "companies",
            ResourceKind::Products => "products",
            ResourceKind::Categories => "categories",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 上传的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 单次导入的请求参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportQuery {
    pub auto_create: Option<bool>,
    pub lang: Option<String>,
}

/// 导入响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    pub total_rows: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl From<ImportReport> for ImportApiResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            total_rows: report.total_rows,
            created: report.created,
            updated: report.updated,
            skipped: report.skipped,
            errors: report.errors,
        }
    }
}

// ==========================================
// ImportApi - 导入 API
// ==========================================
pub struct ImportApi {
    conn: Arc<Mutex<Connection>>,
    config: Arc<dyn ImportConfigReader>,
}

impl ImportApi {
    /// 创建新的 ImportApi 实例
    ///
    /// # 参数
    /// - conn: 共享数据库连接
    /// - config: 导入配置读取器（config_kv / config.toml）
    pub fn new(conn: Arc<Mutex<Connection>>, config: Arc<dyn ImportConfigReader>) -> Self {
        Self { conn, config }
    }

    /// 组装运行参数
    pub async fn resolve_options(&self, query: &ImportQuery) -> ImportOptions {
        let auto_create = match query.auto_create {
            Some(value) => value,
            None => self.config.get_auto_create_related().await.unwrap_or_else(|e| {
                warn!(error = %e, "读取 auto_create_related 失败，使用 false");
                false
            }),
        };
        let error_limit = self.config.get_error_preview_limit().await.unwrap_or_else(|e| {
            warn!(error = %e, "读取 error_preview_limit 失败，使用默认值");
            ImportOptions::default().error_limit
        });

        ImportOptions {
            auto_create,
            error_limit,
            locale: normalize_locale(query.lang.as_deref()),
        }
    }

    /// 导入上传的 Excel 文件
    ///
    /// # 参数
    /// - kind: 资源类别
    /// - file: 上传文件（None 表示请求中缺少 file 字段）
    /// - query: 单次导入参数
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 已处理全部数据行（行级错误在 errors 中）
    /// - Err(ApiError::InvalidInput): 文件缺失 / 格式错误 / 缺少必需列
    pub async fn import(
        &self,
        kind: ResourceKind,
        file: Option<UploadedFile>,
        query: &ImportQuery,
    ) -> ApiResult<ImportApiResponse> {
        let options = self.resolve_options(query).await;
        let file = file.ok_or_else(|| ApiError::from_import(ImportError::MissingFile, &options.locale))?;

        info!(
            resource = %kind,
            file_name = %file.file_name,
            auto_create = options.auto_create,
            "开始导入"
        );

        let conn = self.conn.clone();
        let locale = options.locale.clone();
        let result = tokio::task::spawn_blocking(move || match kind {
            ResourceKind::Companies => run(CompanyResource::new(conn), &file, &options),
            ResourceKind::Products => run(ProductResource::new(conn), &file, &options),
            ResourceKind::Categories => run(CategoryResource::new(conn), &file, &options),
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("导入任务异常终止: {}", e)))?;

        result
            .map(ImportApiResponse::from)
            .map_err(|e| ApiError::from_import(e, &locale))
    }
}

fn run<R: ImportResource>(
    resource: R,
    file: &UploadedFile,
    options: &ImportOptions,
) -> Result<ImportReport, ImportError> {
    ImportEngine::new(resource).import_bytes(&file.file_name, &file.bytes, options)
}
