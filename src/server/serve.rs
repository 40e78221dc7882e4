use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};

pub async fn serve<S: ToSocketAddrs>(addr: S, router: Router) -> std::io::Result<()> {
    let tcp_listener = TcpListener::bind(addr).await?;
    if let Ok(local) = tcp_listener.local_addr() {
        tracing::info!("Server running on http://localhost:{}", local.port());
    }

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections");
}
