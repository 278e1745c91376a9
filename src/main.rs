//! VU2050 hunt backend binary entrypoint wiring REST routes and storage.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod content;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::{AppConfig, StorageBackendConfig};
use dao::team_store::{TeamStore, memory::MemoryTeamStore};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load().context("loading configuration")?;
    let store = connect_store(&config).await?;
    let app_state = AppState::new(store, config.admin_token.clone());

    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Connect the storage backend chosen by configuration. The choice is made
/// exactly once; a backend that cannot be reached at startup is fatal.
async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn TeamStore>> {
    match &config.backend {
        StorageBackendConfig::Memory => {
            info!("using the in-memory team store");
            let store: Arc<dyn TeamStore> = Arc::new(MemoryTeamStore::new());
            Ok(store)
        }
        StorageBackendConfig::Mongo { uri, database } => {
            #[cfg(feature = "mongo-store")]
            {
                use dao::team_store::mongodb::{MongoConfig, MongoTeamStore};

                let mongo_config = MongoConfig::from_uri(uri, database.as_deref())
                    .await
                    .context("parsing MongoDB configuration")?;
                let store = MongoTeamStore::connect(mongo_config)
                    .await
                    .context("connecting to MongoDB")?;
                info!("connected to the MongoDB team store");
                let store: Arc<dyn TeamStore> = Arc::new(store);
                Ok(store)
            }
            #[cfg(not(feature = "mongo-store"))]
            {
                let _ = (uri, database);
                anyhow::bail!("this build does not include the mongo-store feature")
            }
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: state::SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
