//! HTTP server implementation

use crate::api::{middleware, routes};
use crate::app::AppState;
use anyhow::{bail, Context, Result};
use axum::Router;
use std::{future::Future, io::ErrorKind, net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

/// HTTP server for the site and the config endpoints
pub struct ApiServer {
    app: Router,
    addr: SocketAddr,
}

impl ApiServer {
    /// Create a new server
    pub fn new(state: Arc<AppState>) -> Result<Self> {
        let addr = state
            .config
            .socket_addr()
            .map_err(anyhow::Error::msg)
            .context("Invalid server host/port configuration")?;

        let app = build_router(state);

        info!("HTTP server configured for {}", addr);

        Ok(Self { app, addr })
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = match TcpListener::bind(self.addr).await {
            Ok(listener) => listener,
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                bail!(
                    "Port {} is already in use; another program or a running server may be holding it",
                    self.addr.port()
                );
            }
            Err(e) => return Err(e).context("Failed to bind to server address"),
        };

        info!("HTTP server listening on http://{}", self.addr);

        axum::serve(listener, self.app.clone())
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error")?;

        info!("HTTP server shutdown complete");
        Ok(())
    }
}

/// Build the full router: API routes, the index page and static files
pub fn build_router(state: Arc<AppState>) -> Router {
    let site = &state.config.site;
    let server = &state.config.server;

    let static_files = ServeDir::new(site.root_path());
    let index = ServeFile::new(site.index_path());

    let mut app = routes::create_routes()
        .route_service("/", index)
        .fallback_service(static_files)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(axum::middleware::from_fn(middleware::answer_options));

    if server.cors_enabled {
        app = app.layer(axum::middleware::from_fn(middleware::cors_headers));
    }

    app.with_state(state)
}
