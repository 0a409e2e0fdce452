use std::net::SocketAddr;

use dotenvy::dotenv;
use tracing::{error, info, warn};

use edugroup::logging::{init_tracing, shutdown_tracer};
use edugroup::metrics::{init_metrics, metrics_app};
use edugroup::router::init_router;
use edugroup::state::init_app_state;
use edugroup_config::ServerConfig;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env();

    if let Some(handle) = init_metrics() {
        let metrics_addr = server_config.metrics_bind_addr();
        tokio::spawn(async move {
            match tokio::net::TcpListener::bind(&metrics_addr).await {
                Ok(listener) => {
                    info!(addr = %metrics_addr, "Metrics endpoint listening");
                    if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                        error!(error = %e, "Metrics server stopped");
                    }
                }
                Err(e) => warn!(addr = %metrics_addr, error = %e, "Failed to bind metrics listener"),
            }
        });
    }

    let state = init_app_state().await;

    if let Err(e) = edugroup_db::run_migrations(&state.db).await {
        error!(error = %e, "Failed to run database migrations");
        shutdown_tracer().await;
        return;
    }

    let app = init_router(state);

    let addr = server_config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %addr, error = %e, "Failed to bind server address");
            shutdown_tracer().await;
            return;
        }
    };

    info!("🚀 Server running on http://{}", addr);
    info!("📚 Swagger UI available at http://{}/swagger-ui", addr);
    info!("📖 Scalar UI available at http://{}/scalar", addr);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        error!(error = %e, "Server error");
    }

    shutdown_tracer().await;
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
