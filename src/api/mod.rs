pub mod handlers;
pub mod responses;
pub mod routes;
pub mod state;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Settings;
use crate::utils::error::Result;

pub use routes::create_router;
pub use state::AppState;

/// 以設定建立完整的路由 (含 NHTSA 用戶端)
pub fn create_app(settings: Settings) -> Router {
    create_router(AppState::from_settings(settings))
}

/// 在已綁定的 listener 上提供服務，直到收到 Ctrl+C
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("🚀 Server listening on {}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Signal received, shutting down");
}
