//! # HTTP 服务器
//!
//! Axum HTTP服务器，组装路由、CORS 与请求日志

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app::AppContext;
use crate::config::ServerConfig;
use crate::error::{GatewayError, Result};

/// HTTP服务器应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    /// 创建应用状态
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// HTTP 服务器
pub struct HttpServer {
    /// 配置
    config: ServerConfig,
    /// 路由器
    router: Router,
}

impl HttpServer {
    /// 创建新的HTTP服务器
    #[must_use]
    pub fn new(config: ServerConfig, context: Arc<AppContext>) -> Self {
        let state = AppState::new(context);
        let router = Self::create_router(state, &config);

        Self { config, router }
    }

    /// 创建路由器
    fn create_router(state: AppState, config: &ServerConfig) -> Router {
        let app = super::routes::create_routes(state);

        // 配置CORS
        let mut cors_layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
                header::ORIGIN,
            ]);

        if config.cors_origins.contains(&"*".to_string()) {
            cors_layer = cors_layer.allow_origin(Any);
        } else {
            let origins = config
                .cors_origins
                .iter()
                .map(|origin| origin.parse::<HeaderValue>())
                .collect::<std::result::Result<Vec<_>, _>>();

            match origins {
                Ok(origins) => {
                    cors_layer = cors_layer.allow_origin(origins);
                }
                Err(e) => {
                    warn!("invalid CORS origin configuration: {e}, falling back to allow any");
                    cors_layer = cors_layer.allow_origin(Any);
                }
            }
        }

        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
    }

    /// 取出路由器（用于进程内测试）
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// 启动服务器
    pub async fn serve(self) -> Result<()> {
        let bind_address = self.config.bind_address.clone();
        let ip = bind_address.parse::<std::net::IpAddr>().map_err(|e| {
            GatewayError::config(format!("invalid bind address '{bind_address}': {e}"))
        })?;
        let addr = SocketAddr::new(ip, self.config.port);

        info!("starting HTTP server on {addr}");

        let listener = TcpListener::bind(&addr).await?;

        axum::serve(listener, self.router)
            .await
            .map_err(|e| GatewayError::internal_with_source("HTTP server error", e))?;

        Ok(())
    }
}
