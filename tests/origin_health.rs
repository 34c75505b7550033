//! Origin health checks against a live HTTPS origin with a self-signed certificate.

use serde_json::json;

use edge_gateway::config::ProbeConfig;
use edge_gateway::handlers::health::readiness_response;
use edge_gateway::health::{HealthStatus, HttpsProber};

mod common;

fn origin_checker(health_path: &str) -> HttpsProber {
    HttpsProber::new(ProbeConfig {
        health_path: health_path.into(),
        timeout_secs: 2,
        fallback_host: "127.0.0.1".into(),
        verify_tls: false,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fallback_keeps_original_host_header() {
    let (addr, hosts) = common::start_https_origin(json!({
        "health_status": "OK",
        "database": "OK"
    }))
    .await;

    // The literal host never resolves; the fallback reaches the origin on the same port.
    let host = format!("origin.invalid:{}", addr.port());
    let doc = origin_checker("/fn/__hc").check(&host).await;

    assert_eq!(doc.health_status, Some(HealthStatus::Ok));
    assert_eq!(doc.error, None);
    assert_eq!(doc.components["database"], "OK");
    assert_eq!(*hosts.lock().unwrap(), vec![host]);
    assert_eq!(readiness_response(&doc).status.as_u16(), 200);
}

#[tokio::test]
async fn test_non_200_origin_reports_status() {
    let (addr, hosts) = common::start_https_origin(json!({ "health_status": "OK" })).await;

    let doc = origin_checker("/down").check(&addr.to_string()).await;

    assert_eq!(doc.error, Some(json!("origin returned 503")));
    assert!(doc.health_status.is_none());
    assert!(hosts.lock().unwrap().is_empty());
    assert_eq!(readiness_response(&doc).status.as_u16(), 500);
}

#[tokio::test]
async fn test_null_error_from_origin_fails_readiness() {
    let (addr, _hosts) = common::start_https_origin(json!({
        "health_status": "OK",
        "error": null
    }))
    .await;

    let doc = origin_checker("/fn/__hc").check(&addr.to_string()).await;
    let response = readiness_response(&doc);
    assert_eq!(response.status.as_u16(), 500);

    let body: serde_json::Value = serde_json::from_str(response.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["origin"], json!({ "health_status": "OK", "error": null }));
}
