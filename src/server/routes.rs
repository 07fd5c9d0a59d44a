//! # 路由配置
//!
//! 定义所有API路由和路由组织

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use super::handlers;
use super::server::AppState;
use crate::auth::middleware::require_auth;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    // 需要 Bearer 认证的路由
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route("/dsp/query", post(handlers::dsp_query))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        // 健康检查路由
        .route("/", get(handlers::health))
        // 认证路由
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .merge(protected)
        .with_state(state)
}
