use std::sync::Arc;

use k8s_inventory::ScanKind;
use k8s_inventory_kubeapi::KubeApi;
use k8s_inventory_scanner::{NamespaceScanner, PodScanner, Scheduler, SecretScanner};

use axum::extract::State;
use axum::http;
use axum::routing::get;
use axum::Router;
use tokio::signal::unix::{signal, SignalKind};

use crate::config::{Config, LogFormat};

mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env().unwrap_or_else(|err| {
        // Logging is not up yet; configuration problems go to stderr.
        eprintln!("invalid configuration: {err}");
        std::process::exit(1);
    });
    init_tracing(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        interval = ?config.scan.interval,
        scope = %config.scope,
        "starting k8s-inventory-agent"
    );

    let kubeapi = Arc::new(KubeApi::new().await?);

    let mut scheduler = Scheduler::new(&config.scan)?;
    for kind in &config.scan.kinds {
        match kind {
            ScanKind::Namespaces => scheduler.spawn(NamespaceScanner::new(kubeapi.clone())),
            ScanKind::Pods => {
                scheduler.spawn(PodScanner::new(kubeapi.clone(), config.scope.clone()));
            }
            ScanKind::Secrets => {
                let mut scanner = SecretScanner::new(kubeapi.clone(), config.scope.clone());
                if let Some(type_name) = &config.secret_type {
                    scanner = scanner.with_type_filter(type_name.clone());
                }
                scheduler.spawn(scanner);
            }
        }
    }

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .with_state(kubeapi.clone());
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("health endpoints on http://{addr}");
    }
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!(%err, "health server failed");
        }
    });

    shutdown_signal().await?;
    tracing::info!(grace = ?config.scan.grace_period, "received shutdown signal");
    scheduler.shutdown(config.scan.grace_period).await;
    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &Config) {
    // RUST_LOG wins over the configured level when present.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    match config.logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() -> std::io::Result<()> {
    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn readyz(
    State(kubeapi): State<Arc<KubeApi>>,
) -> Result<&'static str, (http::StatusCode, String)> {
    kubeapi
        .check_health()
        .await
        .map(|()| "ok")
        .map_err(|err| (http::StatusCode::SERVICE_UNAVAILABLE, err.to_string()))
}
