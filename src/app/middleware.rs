// ==========================================
// B2B 交易平台 - HTTP 中间件
// ==========================================
// audit_requests: 写请求成功后追加操作日志
// request_logger: 请求耗时 / 状态码
// ==========================================

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::auth::claims_from_headers;
use crate::app::state::AppState;
use crate::domain::action_log::is_mutating_method;

/// 操作日志中间件
///
/// 条件: POST/PUT/PATCH/DELETE + 请求携带有效令牌 + 状态码 < 400
/// 写日志失败只记录 error，不影响响应
pub async fn audit_requests(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let user_id = if is_mutating_method(&method) {
        claims_from_headers(req.headers(), &state.jwt_secret)
            .ok()
            .and_then(|claims| claims.user_id())
    } else {
        None
    };

    let response = next.run(req).await;

    if let Some(user_id) = user_id {
        let status = response.status().as_u16();
        let api = state.action_log_api.clone();
        let result = tokio::task::spawn_blocking(move || {
            api.record_request(user_id, &method, &path, status)
        })
        .await;

        match result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::error!(error = %e, user_id, "操作日志写入失败"),
            Err(e) => tracing::error!(error = %e, user_id, "操作日志任务异常终止"),
        }
    }

    response
}

/// 请求日志中间件
pub async fn request_logger(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    if status >= 500 {
        tracing::warn!(%method, %path, status, elapsed_ms, "request");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, "request");
    }
    response
}
