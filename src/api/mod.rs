// ==========================================
// B2B 交易平台 - API 层
// ==========================================
// 职责: 业务服务门面，供 app 层 HTTP 处理器调用
// ==========================================

pub mod action_log_api;
pub mod currency_api;
pub mod error;
pub mod export_api;
pub mod import_api;
pub mod moderation_api;

// 重导出核心类型
pub use action_log_api::ActionLogApi;
pub use currency_api::{ConvertRequest, ConvertResponse, CurrencyApi, RatesResponse};
pub use error::{ApiError, ApiResult};
pub use export_api::{ExportApi, XlsxFile, XLSX_CONTENT_TYPE};
pub use import_api::{ImportApi, ImportApiResponse, ImportQuery, ResourceKind, UploadedFile};
pub use moderation_api::{ModerationApi, ModerationRequest};
