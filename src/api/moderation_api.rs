// ==========================================
// B2B 交易平台 - 审核 API
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::moderation::{ModeratedItem, ModerationKind, ModerationService};
use chrono::Utc;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex};

/// PATCH 请求体
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModerationRequest {
    #[serde(default)]
    pub status: String,
}

impl ModerationRequest {
    /// 从原始请求体解析
    ///
    /// 非 JSON、缺少 status 或 status 不是字符串时得到空 status，
    /// 由审核服务统一判为 Invalid status
    pub fn from_body(body: &[u8]) -> Self {
        let status = serde_json::from_slice::<JsonValue>(body)
            .ok()
            .and_then(|value| value.get("status").and_then(JsonValue::as_str).map(str::to_string))
            .unwrap_or_default();
        Self { status }
    }
}

pub struct ModerationApi {
    service: Arc<ModerationService>,
}

impl ModerationApi {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            service: Arc::new(ModerationService::new(conn)),
        }
    }

    /// 待审核列表
    pub async fn list_pending(&self, kind: &str) -> ApiResult<Vec<ModeratedItem>> {
        let kind = ModerationKind::from_path(kind)?;
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || service.list_pending(kind))
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?
            .map_err(ApiError::from)
    }

    /// 写入审核结果
    ///
    /// # 返回
    /// - Ok(ModeratedItem): 更新后的实体
    /// - Err(InvalidInput("Invalid status")): status 不是 APPROVED / REJECTED
    /// - Err(NotFound): 记录不存在
    pub async fn set_status(
        &self,
        kind: &str,
        id: i64,
        request: ModerationRequest,
    ) -> ApiResult<ModeratedItem> {
        let kind = ModerationKind::from_path(kind)?;
        let service = self.service.clone();
        let now = Utc::now().naive_utc();
        tokio::task::spawn_blocking(move || service.set_status(kind, id, &request.status, now))
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?
            .map_err(ApiError::from)
    }
}
