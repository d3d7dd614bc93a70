//! HTTP server setup.
//!
//! # Responsibilities
//! - Freeze the router into a shared `Dispatcher`
//! - Build the Axum service with a single catch-all handler
//! - Wire up middleware layers (request ID, tracing)
//! - Bind the listener and serve connections
//!
//! # Design Decisions
//! - Axum/hyper own HTTP/1.1 framing; all routing happens in the dispatcher
//! - One Tokio task per connection, requests never share mutable state
//! - No request timeout: a client that never finishes its body stalls only its own task

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, Response},
    Router as AxumRouter,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::http::request_id::MakeRequestUuidV4;
use crate::routing::{Dispatcher, Router};

/// HTTP server running a frozen router.
pub struct Server {
    dispatcher: Arc<Dispatcher>,
    config: ServerConfig,
}

impl Server {
    /// Freeze `router` and prepare to serve it. No routes can be added afterwards.
    pub fn new(router: Router, config: ServerConfig) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(router, config.limits.max_body_size));
        Self { dispatcher, config }
    }

    /// Build the Axum service with all middleware layers.
    pub fn app(&self) -> AxumRouter {
        AxumRouter::new()
            .fallback(dispatch_handler)
            .with_state(Arc::clone(&self.dispatcher))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Bind the configured address and serve until the process exits.
    pub async fn start(self) -> Result<(), ServerError> {
        self.start_with(|_| {}).await
    }

    /// Like [`Server::start`], calling `on_listening` once the socket is bound.
    pub async fn start_with<F>(self, on_listening: F) -> Result<(), ServerError>
    where
        F: FnOnce(SocketAddr),
    {
        let address = self.config.listener.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind { address, source })?;

        let local_addr = listener.local_addr()?;
        tracing::info!(
            address = %local_addr,
            port = local_addr.port(),
            "Routify is running"
        );
        on_listening(local_addr);

        self.serve(listener).await
    }

    /// Serve connections from an already-bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.app();
        axum::serve(listener, app.into_make_service()).await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

/// Catch-all Axum handler: every request goes through the dispatcher.
async fn dispatch_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    request: Request<Body>,
) -> Response<Body> {
    dispatcher.dispatch(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{BoxFuture, HandlerResult};
    use crate::http::{RequestContext, ResponseContext, X_REQUEST_ID};
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    fn echo_id<'a>(
        req: &'a mut RequestContext,
        res: &'a mut ResponseContext,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            res.json(&json!({ "requestId": req.request_id() }))?;
            Ok(())
        })
    }

    #[test]
    fn new_freezes_router_with_config_limit() {
        let mut config = ServerConfig::default();
        config.limits.max_body_size = 16;
        let server = Server::new(
            Router::new().get("/id", echo_id).post("/id", echo_id),
            config,
        );

        assert_eq!(server.config().limits.max_body_size, 16);
        assert_eq!(server.config().listener.port, 3000);
        assert_eq!(server.dispatcher().routes().len(), 2);
    }

    #[tokio::test]
    async fn app_assigns_and_propagates_request_id() {
        let server = Server::new(Router::new().get("/id", echo_id), ServerConfig::default());
        let response = server
            .app()
            .oneshot(Request::builder().uri("/id").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let header = response.headers()[X_REQUEST_ID].to_str().unwrap().to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["requestId"], json!(header));
    }

    #[tokio::test]
    async fn app_keeps_client_request_id() {
        let server = Server::new(Router::new(), ServerConfig::default());
        let response = server
            .app()
            .oneshot(
                Request::builder()
                    .uri("/anything")
                    .header(X_REQUEST_ID, "client-id-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[X_REQUEST_ID], "client-id-1");
    }

    #[tokio::test]
    async fn start_with_reports_bound_address() {
        let mut config = ServerConfig::default();
        config.listener.host = "127.0.0.1".into();
        config.listener.port = 0;

        let (tx, rx) = tokio::sync::oneshot::channel();
        let server = Server::new(Router::new(), config);
        let task = tokio::spawn(async move {
            server
                .start_with(move |addr| {
                    let _ = tx.send(addr);
                })
                .await
        });

        let addr = rx.await.unwrap();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_ne!(addr.port(), 0);
        task.abort();
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = ServerConfig::default();
        config.listener.host = "127.0.0.1".into();
        config.listener.port = taken.local_addr().unwrap().port();

        let err = Server::new(Router::new(), config).start().await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
    }
}
