//! # 配置管理模块
//!
//! 处理应用配置加载、验证和管理

mod app_config;
mod database;

pub use app_config::{AppConfig, AuthConfig, ServerConfig, UpstreamConfig};
pub use database::DatabaseConfig;

use crate::error::{Context as _, Result};
use std::env;
use std::path::Path;

/// 加载配置并应用环境变量覆盖
///
/// 优先读取 `config/config.{RUST_ENV}.toml`；文件不存在时从默认值出发，
/// 随后应用环境变量覆盖，最后做一次整体校验。
pub fn load_config() -> Result<AppConfig> {
    let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
    let config_file = format!("config/config.{env_name}.toml");

    let mut config = if Path::new(&config_file).exists() {
        let config_content = std::fs::read_to_string(&config_file)
            .with_context(|| format!("failed to read config file: {config_file}"))?;
        toml::from_str::<AppConfig>(&config_content)?
    } else {
        AppConfig::default()
    };

    config.apply_env_overrides();
    config.validate()?;

    Ok(config)
}
