// ==========================================
// B2B 交易平台 - 应用层
// ==========================================
// 职责: axum HTTP 服务，连接客户端与 API 层
// ==========================================

pub mod auth;
pub mod handlers;
pub mod http_error;
pub mod middleware;
pub mod routes;
pub mod state;

// 重导出
pub use auth::{issue_token, CurrentUser, TokenClaims};
pub use routes::configure_routes;
pub use state::{get_default_db_path, resolve_db_path, AppState};
