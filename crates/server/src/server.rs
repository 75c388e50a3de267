//! Server bootstrap: wire the store, the wait coordinator and the reload path
//! together, then serve both listeners.

use crate::config::ServerConfig;
use crate::error::Result;
use crate::handlers::{self, AppState};
use crate::reload;
use axum::Router;
use metadir_storage::{Refresher, SnapshotStore, WaitCoordinator};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// A configured metadata server, ready to run.
#[derive(Debug)]
pub struct MetadataServer {
    config: ServerConfig,
    store: Arc<SnapshotStore>,
    refresher: Refresher,
    waits: WaitCoordinator,
}

impl MetadataServer {
    /// Build the server and load the initial snapshot.
    ///
    /// # Errors
    ///
    /// A configured source that fails to load is fatal here, unlike on
    /// reload.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let store = Arc::new(SnapshotStore::new());
        let refresher = Refresher::new(Arc::clone(&store), config.source.build());
        refresher.load_on_start()?;
        let waits = WaitCoordinator::new(Arc::clone(&store), config.wait.clone());
        Ok(Self {
            config,
            store,
            refresher,
            waits,
        })
    }

    /// The published store.
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// The reload handle used by the admin listener and `SIGHUP`.
    pub fn refresher(&self) -> &Refresher {
        &self.refresher
    }

    /// Public router, without connect info.
    pub fn router(&self) -> Router {
        handlers::router(AppState {
            store: Arc::clone(&self.store),
            waits: self.waits.clone(),
            enable_xff: self.config.enable_xff,
        })
    }

    /// Admin router.
    pub fn admin_router(&self) -> Router {
        reload::router(self.refresher.clone())
    }

    /// Bind both listeners and serve until the public listener stops.
    pub async fn run(self) -> Result<()> {
        let listen = self.config.listen_addr()?;
        let listen_reload = self.config.reload_addr()?;

        let admin = TcpListener::bind(listen_reload).await?;
        info!(target: "metadir::server", addr = %listen_reload, "Listening for reload on");
        let admin_app = self.admin_router();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(admin, admin_app).await {
                warn!(target: "metadir::server", error = %e, "Reload listener stopped");
            }
        });

        tokio::spawn(reload::watch_sighup(self.refresher.clone()));

        let public = TcpListener::bind(listen).await?;
        info!(target: "metadir::server", addr = %listen, "Listening on");
        let app = self.router();
        axum::serve(
            public,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }
}
