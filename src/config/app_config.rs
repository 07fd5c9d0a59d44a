//! # 应用配置结构定义

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{GatewayError, Result};

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务器配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: super::DatabaseConfig,
    /// 认证配置
    pub auth: AuthConfig,
    /// DSP 上游配置
    pub upstream: UpstreamConfig,
}

/// HTTP 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// 允许的CORS源地址，`*` 表示放开全部
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT 签名密钥
    pub jwt_secret: String,
    /// JWT 签名算法（HS256 / HS384 / HS512）
    pub jwt_algorithm: String,
    /// 令牌有效期（分钟）
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-env".to_string(),
            jwt_algorithm: "HS256".to_string(),
            token_ttl_minutes: 60,
        }
    }
}

/// DSP 上游配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// 上游基础URL，固定由配置提供，绝不来自请求输入
    pub base_url: String,
    /// 整体请求超时（秒）
    pub timeout_seconds: u64,
    /// 连接超时（秒）
    pub connect_timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://10.45.30.64".to_string(),
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
        }
    }
}

impl AppConfig {
    /// 应用环境变量覆盖（沿用部署环境既有的变量名）
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// 从给定的查找函数读取覆盖值，便于测试注入
    pub fn apply_overrides_from<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = get("DATABASE_URL") {
            self.database.url = value;
        } else if let Some(value) = get("DB_FILE") {
            self.database.url = format!("sqlite://{value}");
        }
        if let Some(value) = get("JWT_SECRET") {
            self.auth.jwt_secret = value;
        }
        if let Some(value) = get("JWT_ALG") {
            self.auth.jwt_algorithm = value;
        }
        if let Some(value) = get("JWT_EXPIRES_MIN") {
            match value.parse() {
                Ok(minutes) => self.auth.token_ttl_minutes = minutes,
                Err(_) => tracing::warn!("ignoring invalid JWT_EXPIRES_MIN value: {value}"),
            }
        }
        if let Some(value) = get("DSP_INTERNAL_BASE") {
            self.upstream.base_url = value;
        }
        if let Some(value) = get("DSP_TIMEOUT_SEC") {
            match value.parse() {
                Ok(seconds) => self.upstream.timeout_seconds = seconds,
                Err(_) => tracing::warn!("ignoring invalid DSP_TIMEOUT_SEC value: {value}"),
            }
        }
        if let Some(value) = get("CORS_ALLOW_ORIGINS") {
            let origins: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(ToString::to_string)
                .collect();
            if !origins.is_empty() {
                self.server.cors_origins = origins;
            }
        }
        if let Some(value) = get("BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = get("PORT") {
            match value.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("ignoring invalid PORT value: {value}"),
            }
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(GatewayError::config(format!(
                "invalid server port: {}",
                self.server.port
            )));
        }

        if self.database.url.is_empty() {
            return Err(GatewayError::config("database URL cannot be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(GatewayError::config(
                "database max_connections must be greater than 0",
            ));
        }

        if self.auth.jwt_secret.is_empty() {
            return Err(GatewayError::config("JWT secret cannot be empty"));
        }
        crate::auth::jwt::parse_algorithm(&self.auth.jwt_algorithm)?;
        if self.auth.token_ttl_minutes <= 0 {
            return Err(GatewayError::config(
                "token TTL must be a positive number of minutes",
            ));
        }

        let base_url = Url::parse(&self.upstream.base_url).map_err(|e| {
            GatewayError::config(format!(
                "invalid upstream base URL '{}': {e}",
                self.upstream.base_url
            ))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(GatewayError::config(format!(
                "upstream base URL must be http or https: {}",
                self.upstream.base_url
            )));
        }
        if self.upstream.timeout_seconds == 0 {
            return Err(GatewayError::config(
                "upstream timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}
