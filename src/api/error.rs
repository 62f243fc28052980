// ==========================================
// B2B 交易平台 - API层错误类型
// ==========================================
// 职责: 汇总下层错误，转换为用户可读的消息
// HTTP 映射见 app::http_error
// ==========================================

use crate::currency::CurrencyError;
use crate::exporter::ExportError;
use crate::i18n::DEFAULT_LOCALE;
use crate::importer::ImportError;
use crate::moderation::ModerationError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    /// 消息原样返回给客户端
    #[error("{0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("未认证: {0}")]
    Unauthorized(String),

    #[error("无权限: {0}")]
    Forbidden(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
// 整批终止类错误 → 400；行级错误不会到达此处（已计入报告）
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::from_import(err, DEFAULT_LOCALE)
    }
}

impl ApiError {
    /// 按请求语言转换导入错误
    pub fn from_import(err: ImportError, locale: &str) -> Self {
        if err.is_request_fatal() {
            return ApiError::InvalidInput(err.localized(locale));
        }
        match err {
            ImportError::Storage { source, .. } => ApiError::from(source),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        match err {
            ModerationError::InvalidStatus(_) => ApiError::InvalidInput(err.to_string()),
            ModerationError::UnknownKind(kind) => ApiError::NotFound(kind),
            ModerationError::NotFound { kind, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", kind, id))
            }
            ModerationError::Repository(err) => ApiError::from(err),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Repository(err) => ApiError::from(err),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<CurrencyError> for ApiError {
    fn from(err: CurrencyError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
