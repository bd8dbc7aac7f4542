//! Match-play tracker binary entrypoint wiring REST, WebSocket, SSE and storage layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchplay_back::{
    config::AppConfig,
    dao::tournament_store::memory::MemoryTournamentStore,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);
    start_storage(&app_state).await;

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Use MongoDB when `MONGO_URI` is set, otherwise keep everything in memory.
async fn start_storage(state: &SharedState) {
    match env::var("MONGO_URI") {
        Ok(uri) => spawn_mongo_supervisor(state, uri),
        Err(_) => {
            info!("MONGO_URI not set; using in-memory storage");
            state
                .install_store(Arc::new(MemoryTournamentStore::new()))
                .await;
        }
    }
}

#[cfg(feature = "mongo-store")]
fn spawn_mongo_supervisor(state: &SharedState, uri: String) {
    use matchplay_back::{
        dao::{
            storage::StorageError,
            tournament_store::{
                TournamentStore,
                mongodb::{MongoConfig, MongoTournamentStore},
            },
        },
        services::storage_supervisor,
    };

    let db_name = env::var("MONGO_DB").ok();
    info!("using MongoDB storage");
    tokio::spawn(storage_supervisor::run(state.clone(), move || {
        let uri = uri.clone();
        let db_name = db_name.clone();
        async move {
            let config = MongoConfig::from_uri(&uri, db_name.as_deref()).await?;
            let store = MongoTournamentStore::connect(config).await?;
            Ok::<_, StorageError>(Arc::new(store) as Arc<dyn TournamentStore>)
        }
    }));
}

#[cfg(not(feature = "mongo-store"))]
fn spawn_mongo_supervisor(_state: &SharedState, _uri: String) {
    warn!("MONGO_URI is set but the mongo-store feature is disabled; staying degraded");
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
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

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "could not install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
