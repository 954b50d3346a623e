//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all handler
//! - Wire up middleware (tracing, body limit)
//! - Bind server to listener with peer address info
//! - Run the per-request pipeline: identify, log, translate, dispatch

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::Level;

use crate::config::ForwarderContext;
use crate::http::client_ip::PeerAddr;
use crate::http::dispatch::Dispatcher;
use crate::http::request::{IncomingRequest, OutboundRequest};
use crate::observability::{AccessLog, AccessRecord};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ForwarderContext>,
    pub dispatcher: Dispatcher,
    pub access_log: AccessLog,
}

/// HTTP server for the forwarder.
pub struct HttpServer {
    router: Router,
    context: Arc<ForwarderContext>,
}

impl HttpServer {
    /// Create a new HTTP server from a validated context.
    pub fn new(context: ForwarderContext) -> Self {
        let context = Arc::new(context);
        let state = AppState {
            dispatcher: Dispatcher::new(&context),
            access_log: AccessLog::new(context.access_log_enabled()),
            context: context.clone(),
        };

        let router = Self::build_router(&context, state);
        Self { router, context }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(context: &ForwarderContext, state: AppState) -> Router {
        let body_limit = match context.max_body_bytes() {
            usize::MAX => DefaultBodyLimit::disable(),
            limit => DefaultBodyLimit::max(limit),
        };

        Router::new()
            .route("/", any(forward_handler))
            .route("/{*path}", any(forward_handler))
            .with_state(state)
            .layer(body_limit)
            // Failed forwards are reported once, by the dispatcher.
            .layer(
                TraceLayer::new_for_http()
                    .on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
            )
    }

    /// The router without a listener, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.context.upstream(),
            access_log = self.context.access_log_enabled(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: every method, every path.
async fn forward_handler(
    State(state): State<AppState>,
    PeerAddr(peer): PeerAddr,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let incoming = IncomingRequest {
        method,
        uri,
        headers,
        body,
        peer,
    };

    let client_ip = incoming.client_ip();

    state.access_log.record(|| AccessRecord {
        method: incoming.method.clone(),
        uri: incoming.path_and_query(),
        body_bytes: incoming.body.len(),
        client_ip: client_ip.clone(),
    });

    let outbound = OutboundRequest::translate(incoming, state.context.upstream(), &client_ip);
    state.dispatcher.dispatch(outbound).await.into_response()
}
