//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, body limit, session gate)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::catalog::Catalog;
use crate::config::GatewayConfig;
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::{catalog, order, pages};
use crate::resilience::{RetryPolicy, TimedCall};
use crate::security::session;
use crate::upstream::OrderProxy;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub proxy: OrderProxy,
    /// Resolved once from `upstream.base_url` + `upstream.path`.
    pub default_destination: Option<Arc<str>>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(config: GatewayConfig, catalog: Catalog) -> Result<Self, reqwest::Error> {
        let proxy = OrderProxy::new(TimedCall::from_config(&config.upstream)?, RetryPolicy::from_config(&config.upstream));
        let default_destination = config.upstream.resolve_default_destination().map(Arc::from);
        Ok(Self {
            config: Arc::new(config),
            proxy,
            default_destination,
            catalog: Arc::new(catalog),
        })
    }
}

/// HTTP server for the order gateway.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and catalog.
    pub fn new(config: GatewayConfig, catalog: Catalog) -> Result<Self, reqwest::Error> {
        let state = AppState::new(config, catalog)?;

        if state.default_destination.is_none() {
            tracing::warn!("No upstream.base_url configured; order requests must carry 'url'");
        }

        let router = Self::build_router(state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let max_body = state.config.listener.max_body_bytes;

        let pages = Router::new()
            .route("/", get(pages::index))
            .route("/order", get(pages::order_page))
            .route_layer(middleware::from_fn_with_state(state.clone(), session::session_gate));

        Router::new()
            .route("/login", get(pages::login_page))
            .route("/api/login", post(session::login))
            .route("/api/order", post(order::proxy_order))
            .route("/api/products", get(catalog::list_products).post(catalog::echo_product))
            .route("/api/products/{id}", get(catalog::get_product))
            .route("/api/users/{id}", get(catalog::get_user))
            .merge(pages)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(DefaultBodyLimit::disable())
                    .layer(RequestBodyLimitLayer::new(max_body)),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            default_destination = self.state.default_destination.as_deref().unwrap_or("<none>"),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
