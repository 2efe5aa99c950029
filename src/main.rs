use std::{path::PathBuf, sync::Arc};

use tokio::net::TcpListener;
use tracing::info;
use user_crud::{
    config::DatabaseBackend,
    create_app,
    infrastructure::{Logger, MemoryCollection},
    DocumentCollection, Settings,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // 第一个参数可指定配置文件路径
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let (settings, source) = Settings::load(config_path.as_deref())?;

    Logger::init(&settings.logging)?;
    match source {
        Some(path) => info!("从配置文件加载: {}", path.display()),
        None => info!("未找到配置文件，使用默认配置"),
    }

    match settings.database.backend {
        DatabaseBackend::Memory => {
            info!("使用内存文档集合，数据不会持久化");
            serve(&settings, Arc::new(MemoryCollection::new())).await?;
        }
        #[cfg(feature = "database")]
        DatabaseBackend::Mongodb => {
            let manager =
                user_crud::infrastructure::DatabaseManager::connect(&settings.database).await?;
            let collection = manager.collection(&settings.database.collection);
            let served = serve(&settings, Arc::new(collection)).await;
            manager.shutdown().await;
            served?;
        }
        #[cfg(not(feature = "database"))]
        DatabaseBackend::Mongodb => {
            return Err("mongodb 后端需要启用 `database` feature".into());
        }
    }

    info!("服务已停止");
    Ok(())
}

async fn serve(settings: &Settings, collection: Arc<dyn DocumentCollection>) -> Result<(), BoxError> {
    let app = create_app(settings, collection)?;

    let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port)).await?;
    let addr = listener.local_addr()?;

    info!(
        "🚀 {} v{} 运行在 http://{}",
        settings.api.title, settings.api.version, addr
    );
    info!("📖 API 端点:");
    info!("   POST   /user/add           - 创建用户");
    info!("   GET    /user/list          - 用户列表 (支持 ?limit=)");
    info!("   GET    /user/retrieve/:id  - 获取用户");
    info!("   PATCH  /user/update/:id    - 更新用户");
    info!("   DELETE /user/delete/:id    - 删除用户");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("无法监听 Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("收到关闭信号，开始优雅停机");
}
