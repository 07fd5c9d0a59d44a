//! # API 响应结构
//!
//! 请求/响应载荷定义，以及统一的错误出口
//! （`{error, detail, status_code}`）。

use axum::{
    Json,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 状态消息
    pub message: String,
}

/// 注册请求体
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    /// 用户邮箱
    pub email: String,
    /// 用户密码（至少 6 个字符）
    pub password: String,
}

/// 登录请求体
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// 用户邮箱
    pub email: String,
    /// 用户密码
    pub password: String,
}

/// 令牌响应
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// 访问令牌
    pub access_token: String,
    /// 令牌类型，固定为 `bearer`
    pub token_type: String,
}

impl TokenResponse {
    /// 构造 Bearer 类型的令牌响应
    #[must_use]
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// 当前用户响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    /// 当前用户邮箱
    pub email: String,
}

/// 统一错误响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// 机器可读错误码
    pub error: String,
    /// 人类可读或结构化的错误明细
    pub detail: Value,
    /// 与响应一致的HTTP状态码
    pub status_code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code) = self.to_http_response_parts();

        let body = ErrorBody {
            error: code.to_string(),
            detail: self.detail(),
            status_code: status.as_u16(),
        };

        let mut response = (status, Json(body)).into_response();
        // 认证失败附带 Bearer 质询
        if self.requires_bearer_challenge() {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
