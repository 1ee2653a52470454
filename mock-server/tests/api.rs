use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, MockState, DEFAULT_SECRET, DEFAULT_STORE};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

/// `fields` plus the default credentials.
fn signed(mut fields: Value) -> Value {
    fields["store"] = json!(DEFAULT_STORE);
    fields["secret"] = json!(DEFAULT_SECRET);
    fields
}

// --- credentials ---

#[tokio::test]
async fn wrong_secret_returns_401() {
    let resp = app()
        .oneshot(json_request(
            "/v2/orderDetail",
            json!({"orderId": "1001", "store": DEFAULT_STORE, "secret": "nope"}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "invalid store or secret");
}

#[tokio::test]
async fn missing_content_type_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v2/orderDetail")
                .body(signed(json!({"orderId": "1001"})).to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// --- versions ---

#[tokio::test]
async fn status_update_is_not_served_on_v2() {
    let resp = app()
        .oneshot(json_request(
            "/v2/updateVendorOrderStatus",
            signed(json!({"orderId": "1001", "orderStatus": "VENDOR_SHIPMENT_READY"})),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_request_is_not_routed() {
    let resp = app()
        .oneshot(Request::builder().uri("/v2/orderDetail").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- orderDetail ---

#[tokio::test]
async fn order_detail_by_reference_id() {
    let resp = app()
        .oneshot(json_request("/v2/orderDetail", signed(json!({"referenceId": "REF-1002"}))))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let order = body_json(resp).await;
    assert_eq!(order["orderId"], "1002");
    assert_eq!(order["merchantOrderId"], "SO-2");
}

#[tokio::test]
async fn order_detail_miss_is_200_with_error_body() {
    let resp = app()
        .oneshot(json_request("/v1/orderDetail", signed(json!({"orderId": "9"}))))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"error": "order not found"}));
}

// --- orderNumbers ---

#[tokio::test]
async fn order_numbers_filters_missing_merchant_ids() {
    let resp = app()
        .oneshot(json_request(
            "/v2/orderNumbers",
            signed(json!({"missingMerchantOrderId": true})),
        ))
        .await
        .unwrap();

    assert_eq!(body_json(resp).await, json!({"orders": [{"orderId": "1001"}]}));
}

#[tokio::test]
async fn order_numbers_since_order_id() {
    let resp = app()
        .oneshot(json_request("/v2/orderNumbers", signed(json!({"sinceOrderId": "1001"}))))
        .await
        .unwrap();

    assert_eq!(body_json(resp).await, json!({"orders": [{"orderId": "1002"}]}));
}

// --- updates ---

#[tokio::test]
async fn update_status_and_tracking_mutate_order() {
    let state = MockState::seeded();

    let resp = app_with_state(state.clone())
        .oneshot(json_request(
            "/v1/updateVendorOrderStatus",
            signed(json!({"orderId": "1001", "orderStatus": "VENDOR_SHIPMENT_READY"})),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, json!({"success": true}));

    let resp = app_with_state(state.clone())
        .oneshot(json_request(
            "/v2/setShipmentTracking",
            signed(json!({"orderId": "1001", "trackingList": [{"numbers": "1Z999"}]})),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, json!({"success": true}));

    let order = state.order("1001").await.unwrap();
    assert_eq!(order.vendor_status.as_deref(), Some("VENDOR_SHIPMENT_READY"));
    assert_eq!(order.tracking_numbers, vec!["1Z999".to_string()]);

    let calls = state.calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].version, "v1");
    assert_eq!(calls[1].endpoint, "setShipmentTracking");
}

#[tokio::test]
async fn update_unknown_order_reports_failure() {
    let resp = app()
        .oneshot(json_request(
            "/v1/updateMerchantOrderId",
            signed(json!({"orderId": "404", "merchantOrderId": "SO-9"})),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["success"], false);
}

#[tokio::test]
async fn update_without_required_field_is_400() {
    let resp = app()
        .oneshot(json_request(
            "/v1/updateMerchantOrderId",
            signed(json!({"orderId": "1001"})),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- createTempCart ---

#[tokio::test]
async fn create_temp_cart_returns_uuid() {
    let resp = app()
        .oneshot(json_request(
            "/v1/createTempCart",
            signed(json!({"storeId": DEFAULT_STORE, "items": [{"sku": "A1", "quantity": 1}]})),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let uuid = body["tempCartUUID"].as_str().unwrap();
    assert_eq!(uuid.len(), 36);
}

#[tokio::test]
async fn create_temp_cart_without_items_is_rejected_in_body() {
    let resp = app()
        .oneshot(json_request("/v1/createTempCart", signed(json!({"storeId": DEFAULT_STORE}))))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"error": "cart has no items"}));
}
