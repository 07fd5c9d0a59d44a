//! # 认证中间件
//!
//! 从请求头中提取 Bearer 令牌，验证并确认主体用户仍然存在，
//! 然后将其注入到请求扩展中。

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::auth::store::UserStore as _;
use crate::error::{GatewayError, Result};
use crate::server::AppState;

/// 认证通过后注入请求扩展的主体信息
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// 令牌主体（用户邮箱）
    pub email: String,
}

/// Axum认证中间件
///
/// 每次调用都重新查询用户存在性，不做跨请求缓存；被删除的账号在下一个
/// 请求即失效。
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    // 从请求头中提取 `Authorization`
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let Some(auth_header) = auth_header else {
        return Err(GatewayError::unauthenticated("Not authenticated"));
    };

    // 提取 Bearer Token，方案名大小写不敏感
    let Some(token) = extract_bearer_token(auth_header) else {
        return Err(GatewayError::unauthenticated("Not authenticated"));
    };

    let claims = state.token_service.validate(token)?;

    let email = claims.sub;
    if email.is_empty() {
        return Err(GatewayError::unauthenticated("Invalid token payload"));
    }

    // 确认主体用户仍然存在
    if state.user_store.find_by_email(&email).await?.is_none() {
        return Err(GatewayError::UserNotFound);
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser { email });

    Ok(next.run(request).await)
}

/// 从 Authorization 头解析 Bearer 令牌
fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
