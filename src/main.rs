//src/main.rs

use sofibor_backend::{build_router, AppState, Config};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    if let Some(admin) = &config.admin {
        app_state
            .auth_service
            .bootstrap_admin(&admin.nome, &admin.email, &admin.senha)
            .await?;
        tracing::info!("👤 Administrador inicial garantido: {}", admin.email);
    }

    let app = build_router(app_state.clone());

    // Inicia o servidor
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    app_state.shutdown().await;
    tracing::info!("Servidor encerrado.");
    Ok(())
}

// Espera Ctrl+C ou SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Falha ao instalar o handler de Ctrl+C: {}", e);
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
                tracing::error!("Falha ao instalar o handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C recebido, encerrando..."),
        _ = terminate => tracing::info!("SIGTERM recebido, encerrando..."),
    }
}
