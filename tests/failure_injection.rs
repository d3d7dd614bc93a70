//! Failure injection tests: every request gets exactly one well-formed response.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use routify::{middleware, Router};

mod common;

#[tokio::test]
async fn test_global_middleware_error() {
    let router = Router::new()
        .use_middleware(middleware(|_req, _res, _next| {
            Box::pin(async { Err("global failure".into()) })
        }))
        .get("/ok", |_req, res| {
            Box::pin(async move {
                res.send("unreachable");
                Ok(())
            })
        });
    let addr = common::spawn_app(router).await;

    let res = common::client()
        .get(format!("http://{addr}/ok"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Middleware Error" }));
}

#[tokio::test]
async fn test_route_middleware_error() {
    let router = Router::new().post_with(
        "/items",
        [middleware(|_req, _res, _next| {
            Box::pin(async { Err("route failure".into()) })
        })],
        |_req, res| {
            Box::pin(async move {
                res.send("unreachable");
                Ok(())
            })
        },
    );
    let addr = common::spawn_app(router).await;

    let res = common::client()
        .post(format!("http://{addr}/items"))
        .json(&json!({ "a": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Route Middleware Error" }));
}

#[tokio::test]
async fn test_handler_panic_keeps_server_alive() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let router = Router::new()
        .get("/panic", |_req, _res| {
            Box::pin(async {
                if true {
                    panic!("handler exploded");
                }
                Ok(())
            })
        })
        .get("/count", move |_req, res| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Box::pin(async move {
                res.json(&json!({ "calls": n }))?;
                Ok(())
            })
        });
    let addr = common::spawn_app(router).await;
    let client = common::client();

    let res = client
        .get(format!("http://{addr}/panic"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Internal Server Error" }));

    let res = client
        .get(format!("http://{addr}/count"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "calls": 1 }));
}

#[tokio::test]
async fn test_concurrent_requests_are_isolated() {
    let router = Router::new().put("/echo/:id", |req, res| {
        Box::pin(async move {
            let body = req.parse_body().await.clone();
            let id = req.param("id").unwrap_or_default().to_string();
            res.json(&json!({ "id": id, "body": body }))?;
            Ok(())
        })
    });
    let addr = common::spawn_app(router).await;
    let client = common::client();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let res = client
                .put(format!("http://{addr}/echo/{i}"))
                .json(&json!({ "n": i }))
                .send()
                .await
                .unwrap();
            let body: Value = res.json().await.unwrap();
            (i, body)
        }));
    }

    for task in tasks {
        let (i, body) = task.await.unwrap();
        assert_eq!(body, json!({ "id": i.to_string(), "body": { "n": i } }));
    }
}
