// ==========================================
// B2B 交易平台 - 操作日志 API
// ==========================================
// 写入: 由 app 层中间件在写请求成功后调用
// 读取: 管理员查看最近的审计条目
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::action_log::{is_mutating_method, ActionLog};
use crate::repository::ActionLogRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 列表默认条数
pub const DEFAULT_LOG_LIMIT: usize = 50;

/// 列表最大条数
pub const MAX_LOG_LIMIT: usize = 500;

pub struct ActionLogApi {
    repo: ActionLogRepository,
}

impl ActionLogApi {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            repo: ActionLogRepository::new(conn),
        }
    }

    /// 记录一次写请求
    ///
    /// # 返回
    /// - Ok(Some(action_id)): 已记录
    /// - Ok(None): 不满足记录条件（只读方法或请求失败）
    pub fn record_request(
        &self,
        user_id: i64,
        method: &str,
        path: &str,
        status_code: u16,
    ) -> ApiResult<Option<String>> {
        if !is_mutating_method(method) || status_code >= 400 {
            return Ok(None);
        }
        let log = ActionLog::http_request(user_id, method, path, status_code);
        Ok(Some(self.repo.insert(&log)?))
    }

    /// 最近的操作日志
    pub fn list_recent(&self, limit: Option<usize>) -> ApiResult<Vec<ActionLog>> {
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);
        Ok(self.repo.list_recent(limit)?)
    }
}
