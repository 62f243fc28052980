// ==========================================
// B2B 交易平台 - 路由
// ==========================================
// 公共:   /health, /api/currency/*
// 管理员: /api/admin/*（require_admin）
// 全局:   操作日志 / 请求日志 / CORS
// ==========================================

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{header, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{ImportQuery, ResourceKind};
use crate::app::auth::{require_admin, CurrentUser};
use crate::app::handlers;
use crate::app::middleware::{audit_requests, request_logger};
use crate::app::state::AppState;

/// 上传文件大小上限
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// 配置所有路由
pub fn configure_routes(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .nest("/companies", resource_routes(ResourceKind::Companies))
        .nest("/products", resource_routes(ResourceKind::Products))
        .nest("/categories", resource_routes(ResourceKind::Categories))
        .route("/moderation/:kind", get(handlers::list_pending))
        .route("/moderation/:kind/:id", patch(handlers::set_moderation_status))
        .route("/action-logs", get(handlers::list_action_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/currency/rates", get(handlers::currency_rates))
        .route("/api/currency/convert", post(handlers::currency_convert))
        .nest("/api/admin", admin)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), audit_requests))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state)
}

/// 单个资源的导入 / 导出 / 模板路由
fn resource_routes(kind: ResourceKind) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/import",
            post(
                move |state: State<Arc<AppState>>,
                      user: CurrentUser,
                      query: Query<ImportQuery>,
                      multipart: Multipart| {
                    handlers::import_resource(state, user, kind, query, multipart)
                },
            ),
        )
        .route(
            "/export",
            get(move |state: State<Arc<AppState>>| handlers::export_resource(state, kind)),
        )
        .route(
            "/import-template",
            get(move |state: State<Arc<AppState>>| handlers::import_template(state, kind)),
        )
}
