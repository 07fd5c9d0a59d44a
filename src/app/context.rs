//! 应用上下文
//!
//! 统一持有跨模块共享的服务实例，便于在测试中注入替身实现。

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::{
    AccountService, BcryptPasswordHasher, PasswordHasher, SeaOrmUserStore, TokenService, UserStore,
};
use crate::config::AppConfig;
use crate::error::Result;
use crate::proxy::ProxyGateway;

/// 应用上下文（DI 容器）
#[derive(Clone)]
pub struct AppContext {
    /// 应用配置
    pub config: Arc<AppConfig>,
    /// 数据库连接
    pub db: Arc<DatabaseConnection>,
    /// 用户存储
    pub user_store: Arc<dyn UserStore>,
    /// 令牌服务
    pub token_service: Arc<TokenService>,
    /// 账号服务
    pub accounts: Arc<AccountService>,
    /// DSP 网关
    pub gateway: Arc<ProxyGateway>,
}

impl AppContext {
    /// 从配置构建生产环境上下文
    pub fn from_config(config: Arc<AppConfig>, db: Arc<DatabaseConnection>) -> Result<Self> {
        let user_store: Arc<dyn UserStore> = Arc::new(SeaOrmUserStore::new(db.clone()));
        let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher);
        let token_service = Arc::new(TokenService::new(&config.auth)?);
        let accounts = Arc::new(AccountService::new(
            user_store.clone(),
            hasher,
            token_service.clone(),
        ));
        let gateway = Arc::new(ProxyGateway::new(&config.upstream)?);

        Ok(Self {
            config,
            db,
            user_store,
            token_service,
            accounts,
            gateway,
        })
    }
}
