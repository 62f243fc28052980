// ==========================================
// B2B 交易平台 - HTTP 处理器
// ==========================================
// 处理器只做请求解包 / 响应封装，业务逻辑在 api 层
// ==========================================

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::{
    ApiError, ApiResult, ConvertRequest, ImportApiResponse, ImportQuery, ModerationRequest,
    RatesResponse, ResourceKind, UploadedFile, XlsxFile, XLSX_CONTENT_TYPE,
};
use crate::app::auth::CurrentUser;
use crate::app::state::AppState;
use crate::domain::ActionLog;
use crate::moderation::ModeratedItem;

/// 上传文件的表单字段名
const FILE_FIELD: &str = "file";

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

// ==========================================
// 导入 / 导出
// ==========================================

/// POST /api/admin/{resource}/import
pub async fn import_resource(
    State(state): State<Arc<AppState>>,
    CurrentUser(claims): CurrentUser,
    kind: ResourceKind,
    Query(query): Query<ImportQuery>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportApiResponse>> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        file = Some(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });
        break;
    }

    tracing::debug!(username = %claims.username, resource = %kind, "收到导入请求");
    let response = state.import_api.import(kind, file, &query).await?;
    Ok(Json(response))
}

/// GET /api/admin/{resource}/export
pub async fn export_resource(
    State(state): State<Arc<AppState>>,
    kind: ResourceKind,
) -> ApiResult<Response> {
    let file = state.export_api.export(kind).await?;
    Ok(xlsx_response(file))
}

/// GET /api/admin/{resource}/import-template
pub async fn import_template(
    State(state): State<Arc<AppState>>,
    kind: ResourceKind,
) -> ApiResult<Response> {
    let file = state.export_api.template(kind)?;
    Ok(xlsx_response(file))
}

fn xlsx_response(file: XlsxFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response()
}

// ==========================================
// 审核
// ==========================================

/// GET /api/admin/moderation/{kind}
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<ModeratedItem>>> {
    Ok(Json(state.moderation_api.list_pending(&kind).await?))
}

/// PATCH /api/admin/moderation/{kind}/{id}
pub async fn set_moderation_status(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i64)>,
    body: Bytes,
) -> ApiResult<Json<ModeratedItem>> {
    let request = ModerationRequest::from_body(&body);
    Ok(Json(state.moderation_api.set_status(&kind, id, request).await?))
}

// ==========================================
// 操作日志
// ==========================================

#[derive(Debug, Deserialize)]
pub struct ActionLogQuery {
    pub limit: Option<usize>,
}

/// GET /api/admin/action-logs?limit=N
pub async fn list_action_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActionLogQuery>,
) -> ApiResult<Json<Vec<ActionLog>>> {
    let api = state.action_log_api.clone();
    let logs = tokio::task::spawn_blocking(move || api.list_recent(query.limit))
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))??;
    Ok(Json(logs))
}

// ==========================================
// 汇率
// ==========================================

/// GET /api/currency/rates
pub async fn currency_rates(State(state): State<Arc<AppState>>) -> Json<RatesResponse> {
    Json(state.currency_api.rates().await)
}

/// POST /api/currency/convert
///
/// 错误响应为 {"success": false, "error": "..."}
pub async fn currency_convert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConvertRequest>,
) -> Response {
    match state.currency_api.convert(request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => (
            e.status_code(),
            Json(json!({ "success": false, "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// 未匹配的路由
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
