//! Integration tests for the sync HTTP API.
//!
//! These drive the real router over in-memory storage, so no database
//! is required.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use till_engine::{PullResponse, PushReceipt};
use till_server::store::AnyStore;
use till_server::{create_app, AppState};
use tower::ServiceExt;

fn test_app() -> Router {
    create_app(AppState {
        store: AnyStore::memory(),
    })
}

async fn push(app: &Router, body: Value) -> PushReceipt {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/sync/push")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn pull(app: &Router, since: Option<&str>) -> PullResponse {
    let uri = match since {
        Some(since) => format!("/api/sync/pull?since={since}"),
        None => "/api/sync/pull".to_string(),
    };
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[cfg(test)]
mod api_tests {
    use super::*;

    #[tokio::test]
    async fn health_check_works() {
        let app = test_app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health["status"], "ok");
    }

    #[tokio::test]
    async fn root_names_the_server() {
        let app = test_app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), "Till Sync Server");
    }

    #[tokio::test]
    async fn push_then_pull_round_trips() {
        let app = test_app();

        let receipt = push(
            &app,
            json!({
                "products": [
                    {"id": "p1", "updatedAt": "2024-01-15T10:00:00Z", "name": "Espresso", "price": 4.5}
                ]
            }),
        )
        .await;
        assert!(receipt.success);
        assert_eq!(receipt.processed, 1);

        let response = pull(&app, None).await;
        let products = &response.changes["products"];
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "p1");
        assert_eq!(products[0].field("name"), Some(&json!("Espresso")));
    }

    #[tokio::test]
    async fn accepts_a_full_device_push_body() {
        use chrono::{TimeZone, Utc};
        use till_engine::{aggregator, DeviceStore, EntityKind, SyncRecord};

        let mut device = DeviceStore::new();
        device.upsert(
            EntityKind::Products,
            SyncRecord::new("p1")
                .with_updated_at(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
                .with_field("variants", json!([{"size": "double"}])),
        );

        let changes = aggregator::collect_changes(&device, None);
        let body = serde_json::to_value(&changes).unwrap();
        // A device push body names every entity type, empty lists included.
        assert_eq!(body.as_object().unwrap().len(), 15);

        let app = test_app();
        let receipt = push(&app, body).await;
        assert_eq!(receipt.processed, 1);

        // The structured field arrived encoded and passes through unchanged.
        let response = pull(&app, None).await;
        let product = &response.changes["products"][0];
        assert!(product.field("variants").unwrap().is_string());
    }

    #[tokio::test]
    async fn conflicting_pushes_resolve_by_last_write_wins() {
        let app = test_app();

        push(
            &app,
            json!({"products": [{"id": "p1", "updatedAt": "2024-01-15T10:00:00Z", "name": "first"}]}),
        )
        .await;
        let newer = push(
            &app,
            json!({"products": [{"id": "p1", "updatedAt": "2024-01-15T12:00:00Z", "name": "second"}]}),
        )
        .await;
        assert_eq!(newer.processed, 1);

        // A push that lost the race changes nothing.
        let stale = push(
            &app,
            json!({"products": [{"id": "p1", "updatedAt": "2024-01-15T11:00:00Z", "name": "stale"}]}),
        )
        .await;
        assert_eq!(stale.processed, 0);

        let response = pull(&app, None).await;
        assert_eq!(
            response.changes["products"][0].field("name"),
            Some(&json!("second"))
        );
    }

    #[tokio::test]
    async fn replaying_a_push_processes_nothing() {
        let app = test_app();
        let body = json!({
            "sales": [
                {"id": "s1", "updatedAt": "2024-01-15T10:00:00Z", "total": 12.5},
                {"id": "s2", "updatedAt": "2024-01-15T10:05:00Z", "total": 3.0}
            ]
        });

        let first = push(&app, body.clone()).await;
        let second = push(&app, body).await;

        assert_eq!(first.processed, 2);
        assert_eq!(second.processed, 0);
    }

    #[tokio::test]
    async fn pull_since_excludes_records_on_the_watermark() {
        let app = test_app();
        push(
            &app,
            json!({
                "sales": [
                    {"id": "on", "updatedAt": "2024-01-15T10:00:00Z"},
                    {"id": "after", "updatedAt": "2024-01-15T10:00:01Z"}
                ]
            }),
        )
        .await;

        let response = pull(&app, Some("2024-01-15T10:00:00Z")).await;
        let sales = &response.changes["sales"];
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, "after");
    }

    #[tokio::test]
    async fn pull_omits_empty_entity_types() {
        let app = test_app();
        push(
            &app,
            json!({"products": [{"id": "p1", "updatedAt": "2024-01-15T10:00:00Z"}]}),
        )
        .await;

        let response = pull(&app, None).await;
        assert_eq!(response.changes.len(), 1);
        assert!(!response.changes.contains_key("sales"));
    }

    #[tokio::test]
    async fn malformed_since_serves_a_full_pull() {
        let app = test_app();
        push(
            &app,
            json!({"products": [{"id": "p1", "updatedAt": "2024-01-15T10:00:00Z"}]}),
        )
        .await;

        let response = pull(&app, Some("not-a-timestamp")).await;
        assert_eq!(response.changes["products"].len(), 1);
    }

    #[tokio::test]
    async fn unknown_entity_types_are_ignored() {
        let app = test_app();
        let receipt = push(
            &app,
            json!({
                "wishlist": [{"id": "w1", "updatedAt": "2024-01-15T10:00:00Z"}],
                "products": [{"id": "p1", "updatedAt": "2024-01-15T10:00:00Z"}]
            }),
        )
        .await;

        assert!(receipt.success);
        assert_eq!(receipt.processed, 1);

        let response = pull(&app, None).await;
        assert_eq!(response.changes.len(), 1);
        assert!(response.changes.contains_key("products"));
    }

    #[tokio::test]
    async fn soft_deleted_records_travel_like_any_other_change() {
        let app = test_app();
        push(
            &app,
            json!({
                "coupons": [{
                    "id": "c1",
                    "updatedAt": "2024-01-15T10:00:00Z",
                    "deletedAt": "2024-01-15T10:00:00Z",
                    "code": "EXPIRED"
                }]
            }),
        )
        .await;

        let response = pull(&app, None).await;
        let coupon = &response.changes["coupons"][0];
        assert!(coupon.deleted_at.is_some());
        assert_eq!(coupon.field("code"), Some(&json!("EXPIRED")));
    }

    #[tokio::test]
    async fn pull_timestamp_is_rfc3339() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/sync/pull")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        let raw = value["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(raw).is_ok());
    }

    #[tokio::test]
    async fn rejects_a_non_object_push_body() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sync/push")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("[1, 2, 3]"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
