//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use axum::{
    extract::Path,
    http::{header::HOST, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use edge_gateway::bridge::{BridgeServer, Invoker};
use edge_gateway::config::EdgeConfig;
use edge_gateway::health::{HealthDocument, HealthProbe};
use edge_gateway::lifecycle::Shutdown;

/// Single-record origin-request envelope.
pub fn origin_request(method: &str, uri: &str, headers: &[(&str, &str)]) -> Value {
    let mut header_map = serde_json::Map::new();
    for (name, value) in headers {
        let entries = header_map
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| json!([]));
        if let Some(list) = entries.as_array_mut() {
            list.push(json!({ "key": name, "value": value }));
        }
    }

    json!({
        "Records": [{
            "cf": {
                "config": { "distributionId": "TEST", "eventType": "origin-request" },
                "request": {
                    "clientIp": "203.0.113.7",
                    "method": method,
                    "uri": uri,
                    "querystring": "",
                    "headers": header_map
                }
            }
        }]
    })
}

/// Origin-request envelope with a base64 body.
pub fn origin_request_with_body(method: &str, uri: &str, body_base64: &str) -> Value {
    let mut envelope = origin_request(method, uri, &[("Host", "example.com")]);
    envelope["Records"][0]["cf"]["request"]["body"] = json!({
        "inputTruncated": false,
        "action": "read-only",
        "encoding": "base64",
        "data": body_base64
    });
    envelope
}

/// Single-record origin-response envelope.
pub fn origin_response(status: &str, headers: Value) -> Value {
    json!({
        "Records": [{
            "cf": {
                "config": { "distributionId": "TEST", "eventType": "origin-response" },
                "request": { "method": "GET", "uri": "/", "querystring": "", "headers": {} },
                "response": {
                    "status": status,
                    "statusDescription": "OK",
                    "headers": headers
                }
            }
        }]
    })
}

/// Probe returning queued documents in order, repeating the last one.
pub struct StubProbe {
    documents: Mutex<Vec<HealthDocument>>,
    pub hosts: Mutex<Vec<String>>,
}

impl StubProbe {
    pub fn new(documents: Vec<HealthDocument>) -> Arc<Self> {
        Arc::new(Self {
            documents: Mutex::new(documents),
            hosts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: &str) -> Arc<Self> {
        Self::new(vec![HealthDocument::failed(error)])
    }
}

impl HealthProbe for StubProbe {
    fn probe<'a>(&'a self, host: &'a str) -> BoxFuture<'a, HealthDocument> {
        self.hosts.lock().unwrap().push(host.to_string());
        let document = {
            let mut documents = self.documents.lock().unwrap();
            if documents.len() > 1 {
                documents.remove(0)
            } else {
                documents[0].clone()
            }
        };
        async move { document }.boxed()
    }
}

/// Start the bridge on an ephemeral port.
pub async fn spawn_bridge(config: &EdgeConfig, invoker: Arc<dyn Invoker>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = BridgeServer::new(config, invoker);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// Start a Lambda-style invoke endpoint that answers every invocation with
/// `result` and records the function names and events it received.
pub async fn start_mock_lambda(result: Value) -> (SocketAddr, Arc<Mutex<Vec<(String, Value)>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = calls.clone();

    let app = Router::new().route(
        "/2015-03-31/functions/{name}/invocations",
        post(move |Path(name): Path<String>, Json(event): Json<Value>| {
            let recorded = recorded.clone();
            let result = result.clone();
            async move {
                recorded.lock().unwrap().push((name, event));
                Json(result)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, calls)
}

/// Start an HTTPS origin with a self-signed certificate.
///
/// `/fn/__hc` answers `document` and records the `Host` header of every
/// request; `/down` answers 503.
pub async fn start_https_origin(document: Value) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let hosts = Arc::new(Mutex::new(Vec::new()));
    let recorded = hosts.clone();

    let app = Router::new()
        .route(
            "/fn/__hc",
            get(move |headers: HeaderMap| {
                let recorded = recorded.clone();
                let document = document.clone();
                async move {
                    let host = headers
                        .get(HOST)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    recorded.lock().unwrap().push(host);
                    Json(document)
                }
            }),
        )
        .route(
            "/down",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "health_status": "ERROR" }))) }),
        );

    let fixtures = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tls");
    let tls = RustlsConfig::from_pem_file(fixtures.join("cert.pem"), fixtures.join("key.pem"))
        .await
        .unwrap();

    let handle = axum_server::Handle::new();
    let server = axum_server::bind_rustls("127.0.0.1:0".parse().unwrap(), tls)
        .handle(handle.clone())
        .serve(app.into_make_service());
    tokio::spawn(async move {
        let _ = server.await;
    });

    let addr = handle.listening().await.unwrap();
    (addr, hosts)
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
