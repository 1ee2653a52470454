//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use zonos_core::{ApiError, Cart, ClientConfig, HttpMethod, HttpRequest, HttpResponse, ZonosClient};

const API_HOST: &str = "https://api.iglobalstores.com";

fn client() -> ZonosClient {
    ZonosClient::new(ClientConfig::new("1234", "s3cret"))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{API_HOST}{}", expected["path"].as_str().unwrap()), "{name}: url");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, expected["body"], "{name}: body");
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

// ---------------------------------------------------------------------------
// orderDetail
// ---------------------------------------------------------------------------

#[test]
fn get_order_test_vectors() {
    let raw = include_str!("../../test-vectors/get_order.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input"]["id"].as_str().unwrap();
        let is_reference_id = case["input"]["is_reference_id"].as_bool().unwrap();

        // Verify build
        let req = c.build_get_order(id, is_reference_id).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        // Verify parse
        let result = c.parse_get_order(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "Http" => assert!(matches!(err, ApiError::Http { .. }), "{name}: expected Http"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// updateVendorOrderStatus
// ---------------------------------------------------------------------------

#[test]
fn update_order_status_test_vectors() {
    let raw = include_str!("../../test-vectors/update_order_status.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let order_id = case["input"]["order_id"].as_str().unwrap();
        let status = case["input"]["status"].as_str().unwrap();

        let req = c.build_update_order_status(order_id, status).unwrap();
        assert_request(name, &req, &case["expected_request"]);
    }
}

// ---------------------------------------------------------------------------
// createTempCart
// ---------------------------------------------------------------------------

#[test]
fn create_checkout_test_vectors() {
    let raw = include_str!("../../test-vectors/create_checkout.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let cart: Cart = serde_json::from_value(case["input"]["cart"].clone()).unwrap();
        let country_code = case["input"]["country_code"].as_str();

        // Verify build
        let req = c.build_create_checkout(&cart).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        // Verify parse
        let outcome = c.parse_create_checkout(simulated(case), country_code).unwrap();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            case["expected_result"],
            "{name}: parsed result"
        );
    }
}
