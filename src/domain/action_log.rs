// ==========================================
// B2B 交易平台 - 操作日志领域模型
// ==========================================
// 红线: 只追加，不通过 API 更新或删除
// 用途: 审计追踪（每个成功的写请求一条）
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

/// HTTP 请求审计条目的实体类型
pub const ENTITY_HTTP_REQUEST: &str = "HTTP_REQUEST";

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    // ===== 主键 =====
    pub action_id: String,       // UUID
    pub user_id: Option<i64>,    // 操作人 (系统操作可为 None)

    // ===== 操作描述 =====
    pub action: String,          // 例如 "PATCH /api/admin/moderation/companies/3"
    pub entity_type: String,
    pub entity_id: Option<String>,

    // ===== 操作负载 =====
    pub payload_json: Option<JsonValue>,

    pub created_at: NaiveDateTime,
}

impl ActionLog {
    /// 创建新日志
    pub fn new(user_id: Option<i64>, action: &str, entity_type: &str) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            user_id,
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: None,
            payload_json: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// 记录一次写请求
    pub fn http_request(user_id: i64, method: &str, path: &str, status_code: u16) -> Self {
        Self::new(
            Some(user_id),
            &format!("{} {}", method, path),
            ENTITY_HTTP_REQUEST,
        )
        .with_payload(json!({
            "method": method,
            "path": path,
            "status_code": status_code,
        }))
    }

    pub fn with_entity_id(mut self, entity_id: &str) -> Self {
        self.entity_id = Some(entity_id.to_string());
        self
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }
}

/// 需要审计的请求方法
pub fn is_mutating_method(method: &str) -> bool {
    matches!(method, "POST" | "PUT" | "PATCH" | "DELETE")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_log() {
        let log = ActionLog::http_request(7, "PATCH", "/api/admin/moderation/reviews/1", 200);
        assert_eq!(log.user_id, Some(7));
        assert_eq!(log.action, "PATCH /api/admin/moderation/reviews/1");
        assert_eq!(log.entity_type, ENTITY_HTTP_REQUEST);
        assert_eq!(log.payload_json.unwrap()["status_code"], 200);
    }

    #[test]
    fn test_mutating_methods() {
        assert!(is_mutating_method("DELETE"));
        assert!(!is_mutating_method("GET"));
        assert!(!is_mutating_method("OPTIONS"));
    }
}
