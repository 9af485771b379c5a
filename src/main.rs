// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use token_gate_server::{
    api::router,
    auth::{AcceptAnyIdentity, IdentityVerifier, SecretProvider},
    config::{Config, LogFormat, SecretSource, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::{StoragePaths, UploadStore},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!(?config, "Starting token gate");

    let material = config.load_secret().map_err(|e| {
        error!("Failed to load signing key: {}", e);
        e
    })?;
    if config.secret_source == SecretSource::Ephemeral {
        warn!("No signing key configured; generated an ephemeral key, tokens will not survive a restart");
    }

    let identity: Arc<dyn IdentityVerifier> = match config.users.clone() {
        Some(users) => {
            info!(users = users.len(), "Password verification enabled");
            Arc::new(users)
        }
        None => {
            warn!("TOKEN_USERS not set; issuing tokens for any non-empty username without checking passwords");
            Arc::new(AcceptAnyIdentity)
        }
    };

    let uploads = UploadStore::new(StoragePaths::new(&config.upload_dir));
    let state = AppState::new(material, identity, uploads, config.upload_max_bytes);

    if let SecretSource::File(_) = config.secret_source {
        spawn_secret_reload(config.clone(), state.secrets.clone());
    }

    let app = router(state);

    let addr: SocketAddr = config.bind_address().parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Token gate listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Token gate shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Re-read the key file and rotate on every SIGHUP.
#[cfg(unix)]
fn spawn_secret_reload(config: Config, secrets: SecretProvider) {
    tokio::spawn(async move {
        let mut hangups = match signal::unix::signal(signal::unix::SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                error!("Failed to listen for SIGHUP, key reload disabled: {}", e);
                return;
            }
        };
        while hangups.recv().await.is_some() {
            info!("Received SIGHUP, reloading signing key");
            match config.load_secret() {
                Ok(material) => secrets.rotate(material),
                Err(e) => error!("Keeping previous signing key: {}", e),
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_secret_reload(_config: Config, _secrets: SecretProvider) {
    warn!("Signing key reload on SIGHUP is only supported on unix");
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
