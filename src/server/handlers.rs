//! # 请求处理器
//!
//! 将 HTTP 请求绑定到账号服务与 DSP 网关。

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde_json::Value;

use super::response::{HealthResponse, LoginRequest, MeResponse, SignupRequest, TokenResponse};
use super::server::AppState;
use crate::auth::AuthenticatedUser;
use crate::error::Result;
use crate::proxy::QueryRequest;

/// 健康检查
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Healthy".to_string(),
    })
}

/// 创建用户账号，返回访问令牌
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let token = state.accounts.signup(&payload.email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(TokenResponse::bearer(token))))
}

/// 用户登录，返回访问令牌
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let token = state.accounts.login(&payload.email, &payload.password).await?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// 返回当前认证用户的邮箱
pub async fn me(Extension(user): Extension<AuthenticatedUser>) -> Json<MeResponse> {
    Json(MeResponse { email: user.email })
}

/// 转发认证后的查询到 DSP 上游
pub async fn dsp_query(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<Value>> {
    let body = state.gateway.forward(&payload, &user.email).await?;
    Ok(Json(body))
}
