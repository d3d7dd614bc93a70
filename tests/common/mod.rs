//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use routify::{Router, Server, ServerConfig};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral localhost port and return its address.
pub async fn spawn_app(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = Server::new(router, ServerConfig::default());
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    addr
}

/// HTTP client that never pools or proxies, so every test request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
