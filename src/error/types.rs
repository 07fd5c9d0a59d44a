//! Error type definitions for the gateway.
//!
//! Every failure the service can surface is a `GatewayError` variant, and
//! each variant maps to exactly one HTTP status and machine-readable code.

use axum::http::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

/// 应用主要错误类型
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 配置相关错误
    #[error("configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 数据库相关错误
    #[error("database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 系统内部错误
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO相关错误
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// 序列化/反序列化错误
    #[error("serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// 带上下文信息的错误包装
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<GatewayError>,
    },

    /// 请求未携带可用的 Bearer 凭据
    #[error("{detail}")]
    Unauthenticated { detail: String },

    /// 令牌已过期
    #[error("Token expired")]
    TokenExpired,

    /// 令牌无效（签名、结构或必需声明缺失）
    #[error("Invalid token")]
    TokenInvalid,

    /// 令牌主体对应的用户已不存在
    #[error("User not found")]
    UserNotFound,

    /// 注册时邮箱已被占用
    #[error("User already exists")]
    UserAlreadyExists,

    /// 登录凭据无效（不区分用户不存在与密码错误）
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 请求载荷校验失败
    #[error("{message}")]
    Validation { message: String },

    /// 上游请求超时
    #[error("{detail}")]
    UpstreamTimeout { detail: String },

    /// 上游传输层失败（连接拒绝、DNS、协议错误）
    #[error("{detail}")]
    UpstreamError { detail: String },

    /// 上游返回非 2xx 状态
    #[error("upstream returned status {status}")]
    UpstreamBadResponse { status: u16, body: Value },
}

impl GatewayError {
    /// 将错误转换为HTTP状态码和错误代码
    #[must_use]
    pub fn to_http_response_parts(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::Config { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            GatewayError::Database { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            GatewayError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            GatewayError::Io { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            GatewayError::Serialization { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "serialization_error")
            }
            GatewayError::Context { source, .. } => source.to_http_response_parts(),
            GatewayError::Unauthenticated { .. }
            | GatewayError::TokenExpired
            | GatewayError::TokenInvalid
            | GatewayError::UserNotFound => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            GatewayError::UserAlreadyExists => (StatusCode::BAD_REQUEST, "user_already_exists"),
            GatewayError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            GatewayError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            GatewayError::UpstreamTimeout { .. } => {
                (StatusCode::GATEWAY_TIMEOUT, "upstream_timeout")
            }
            GatewayError::UpstreamError { .. } => (StatusCode::BAD_GATEWAY, "upstream_error"),
            // 上游 400 原样透传，其余非 2xx 一律压平成 502
            GatewayError::UpstreamBadResponse { status: 400, .. } => {
                (StatusCode::BAD_REQUEST, "upstream_bad_response")
            }
            GatewayError::UpstreamBadResponse { .. } => {
                (StatusCode::BAD_GATEWAY, "upstream_bad_response")
            }
        }
    }

    /// 错误响应的 `detail` 字段内容
    #[must_use]
    pub fn detail(&self) -> Value {
        match self {
            GatewayError::UpstreamBadResponse { status, body } => {
                json!({ "status": status, "body": body })
            }
            other => Value::String(other.to_string()),
        }
    }

    /// 认证失败的响应需要携带 `WWW-Authenticate: Bearer` 质询
    #[must_use]
    pub fn requires_bearer_challenge(&self) -> bool {
        matches!(
            self,
            GatewayError::Unauthenticated { .. }
                | GatewayError::TokenExpired
                | GatewayError::TokenInvalid
                | GatewayError::UserNotFound
        )
    }

    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建数据库错误
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// 创建内部错误
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的内部错误
    pub fn internal_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建请求校验错误
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// 创建未认证错误
    pub fn unauthenticated<T: Into<String>>(detail: T) -> Self {
        Self::Unauthenticated {
            detail: detail.into(),
        }
    }

    /// 创建上游超时错误
    pub fn upstream_timeout<T: Into<String>>(detail: T) -> Self {
        Self::UpstreamTimeout {
            detail: detail.into(),
        }
    }

    /// 创建上游传输错误
    pub fn upstream_error<T: Into<String>>(detail: T) -> Self {
        Self::UpstreamError {
            detail: detail.into(),
        }
    }
}

// 自动转换常见错误类型
impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: "file operation failed".to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for GatewayError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parse failed", err)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON processing failed".to_string(),
            source: err.into(),
        }
    }
}

impl From<sea_orm::error::DbErr> for GatewayError {
    fn from(err: sea_orm::error::DbErr) -> Self {
        Self::Database {
            message: "database operation failed".to_string(),
            source: Some(err.into()),
        }
    }
}

// Bcrypt错误转换
impl From<bcrypt::BcryptError> for GatewayError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::internal_with_source("password processing failed", err)
    }
}
