//! # DSP Gateway 主程序
//!
//! 处理用户认证、连接 SQLite 用户库，并将查询中继到内部 DSP 端点。

use std::sync::Arc;
use tracing::error;

use dsp_gateway::app::AppContext;
use dsp_gateway::server::HttpServer;
use dsp_gateway::{Result, config, database, logging};

#[tokio::main]
async fn main() {
    // 初始化日志系统
    logging::init_logging(None);

    if let Err(e) = run().await {
        error!("service failed: {e:?}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // 加载配置（文件 + 环境变量覆盖）
    let config = Arc::new(config::load_config()?);

    // 初始化数据库并应用迁移
    let db = Arc::new(database::init_database(&config.database).await?);
    database::run_migrations(&db).await?;

    // 组装服务并启动
    let context = Arc::new(AppContext::from_config(config.clone(), db)?);
    let server = HttpServer::new(config.server.clone(), context);
    server.serve().await
}
