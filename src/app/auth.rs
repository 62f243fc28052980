// ==========================================
// B2B 交易平台 - 认证与权限
// ==========================================
// 令牌: Bearer JWT (HS256)，claims = {sub, username, is_admin, exp}
// 令牌签发不在本服务范围内，issue_token 仅供运维工具与测试使用
// ==========================================

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::app::state::AppState;

/// 令牌有效期（小时）
const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 用户 id
    pub sub: String,
    pub username: String,
    pub is_admin: bool,
    pub exp: usize,
}

impl TokenClaims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// 签发访问令牌
pub fn issue_token(
    secret: &str,
    user_id: i64,
    username: &str,
    is_admin: bool,
) -> jsonwebtoken::errors::Result<String> {
    let exp = (Utc::now() + chrono::Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS)).timestamp() as usize;
    let claims = TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        is_admin,
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// 校验令牌
pub fn validate_token(secret: &str, token: &str) -> jsonwebtoken::errors::Result<TokenClaims> {
    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// 从 Authorization 头解析 claims
///
/// # 返回
/// - Err(UNAUTHORIZED): 头缺失 / 非 Bearer / 令牌无效或过期
pub fn claims_from_headers(headers: &HeaderMap, secret: &str) -> Result<TokenClaims, StatusCode> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    validate_token(secret, token.trim()).map_err(|e| {
        tracing::debug!(error = %e, "令牌校验失败");
        StatusCode::UNAUTHORIZED
    })
}

/// 需要管理员权限的中间件
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = claims_from_headers(req.headers(), &state.jwt_secret)?;

    if !claims.is_admin {
        tracing::warn!(username = %claims.username, path = %req.uri().path(), "非管理员访问管理接口");
        return Err(StatusCode::FORBIDDEN);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// 当前用户（由 require_admin 写入请求扩展）
///
/// 用法: `async fn handler(CurrentUser(claims): CurrentUser) -> Response`
pub struct CurrentUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
