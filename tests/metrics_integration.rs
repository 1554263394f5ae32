mod common;

use axum::http::{Method, StatusCode};
use common::{body_string, build_app, empty_request, API_TOKEN};
use mockito::Server;
use serde_json::Value;
use tower::ServiceExt;

async fn fetch_metrics(app: &axum::Router) -> Value {
    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/metrics"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    serde_json::from_str(&body_string(response).await).expect("metrics should be JSON")
}

#[tokio::test]
async fn fresh_instance_reports_zero() {
    let (app, _state) = build_app("http://127.0.0.1:9/v1/deals");

    let metrics = fetch_metrics(&app).await;
    assert_eq!(metrics["total_requests"], 0);
    assert_eq!(metrics["mean_request_duration"], "0ns");
    assert_eq!(metrics["mean_request_latency"], "0ns");
    assert_eq!(metrics["endpoint_metrics"], serde_json::json!({}));
    assert_eq!(metrics["endpoint_latencies"], serde_json::json!({}));
}

#[tokio::test]
async fn metrics_requests_count_themselves_afterwards() {
    let (app, _state) = build_app("http://127.0.0.1:9/v1/deals");

    fetch_metrics(&app).await;
    fetch_metrics(&app).await;
    let metrics = fetch_metrics(&app).await;

    assert_eq!(metrics["total_requests"], 2);
    assert_eq!(
        metrics["endpoint_metrics"]
            .as_object()
            .unwrap()
            .keys()
            .collect::<Vec<_>>(),
        vec!["/metrics"]
    );
}

#[tokio::test]
async fn one_entry_per_distinct_path() {
    let mut server = Server::new_async().await;
    for path in ["/v1/deals", "/v1/deals/1", "/v1/deals/2"] {
        server
            .mock("GET", format!("{}?api_token={}", path, API_TOKEN).as_str())
            .with_status(200)
            .with_body("{}")
            .expect_at_least(1)
            .create_async()
            .await;
    }

    let (app, state) = build_app(&format!("{}/v1/deals", server.url()));
    for path in ["/deals", "/deals/1", "/deals/1", "/deals/2", "/deals"] {
        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, path))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let snapshot = state.metrics.snapshot();
    assert_eq!(snapshot.total_requests, 5);
    assert_eq!(
        snapshot.endpoint_metrics.keys().collect::<Vec<_>>(),
        vec!["/deals", "/deals/1", "/deals/2"]
    );
    assert_eq!(snapshot.endpoint_latencies.len(), 3);
}

#[tokio::test]
async fn separate_instances_do_not_share_totals() {
    let (first, _first_state) = build_app("http://127.0.0.1:9/v1/deals");
    let (second, _second_state) = build_app("http://127.0.0.1:9/v1/deals");

    fetch_metrics(&first).await;
    fetch_metrics(&first).await;

    assert_eq!(fetch_metrics(&second).await["total_requests"], 0);
    assert_eq!(fetch_metrics(&first).await["total_requests"], 2);
}
