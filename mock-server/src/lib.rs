//! In-memory imitation of the Zonos order and checkout endpoints.
//!
//! Serves `POST /v{N}/{endpoint}` with the same version split as the hosted
//! API: status, merchant-id and temp-cart calls only exist on `v1`, tracking
//! only on `v2`, order lookups on both. Credentials are checked on every
//! call and every accepted body is recorded for inspection.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_STORE: &str = "1234";
pub const DEFAULT_SECRET: &str = "test-secret";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub reference_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_status: Option<String>,
    pub tracking_numbers: Vec<String>,
}

impl Order {
    pub fn new(order_id: &str, reference_id: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            reference_id: reference_id.to_string(),
            merchant_order_id: None,
            vendor_status: None,
            tracking_numbers: Vec::new(),
        }
    }
}

/// A call the server accepted, as it arrived.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub version: String,
    pub endpoint: String,
    pub body: Value,
}

#[derive(Default)]
struct Store {
    orders: BTreeMap<String, Order>,
    carts: BTreeMap<Uuid, Value>,
    calls: Vec<RecordedCall>,
}

/// Shared server state. Clones observe the same orders and call log.
#[derive(Clone)]
pub struct MockState {
    store_id: String,
    secret: String,
    inner: Arc<RwLock<Store>>,
}

impl MockState {
    pub fn new(store_id: &str, secret: &str) -> Self {
        Self::with_orders(store_id, secret, Vec::new())
    }

    pub fn with_orders(store_id: &str, secret: &str, orders: Vec<Order>) -> Self {
        let store = Store {
            orders: orders.into_iter().map(|o| (o.order_id.clone(), o)).collect(),
            ..Store::default()
        };
        Self {
            store_id: store_id.to_string(),
            secret: secret.to_string(),
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// State with the default credentials and two orders, `1001` and `1002`.
    pub fn seeded() -> Self {
        let mut second = Order::new("1002", "REF-1002");
        second.merchant_order_id = Some("SO-2".to_string());
        Self::with_orders(
            DEFAULT_STORE,
            DEFAULT_SECRET,
            vec![Order::new("1001", "REF-1001"), second],
        )
    }

    pub async fn order(&self, order_id: &str) -> Option<Order> {
        self.inner.read().await.orders.get(order_id).cloned()
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.inner.read().await.calls.clone()
    }

    /// `calls` for callers outside the runtime.
    pub fn calls_blocking(&self) -> Vec<RecordedCall> {
        self.inner.blocking_read().calls.clone()
    }

    pub fn order_blocking(&self, order_id: &str) -> Option<Order> {
        self.inner.blocking_read().orders.get(order_id).cloned()
    }

    pub fn cart_blocking(&self, temp_cart_uuid: &str) -> Option<Value> {
        let id = Uuid::parse_str(temp_cart_uuid).ok()?;
        self.inner.blocking_read().carts.get(&id).cloned()
    }
}

pub fn app() -> Router {
    app_with_state(MockState::seeded())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/{version}/{endpoint}", post(dispatch))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, MockState::seeded()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), "mock zonos api listening");
    axum::serve(listener, app_with_state(state)).await
}

type Reply = (StatusCode, Json<Value>);

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

/// Endpoints and the versions they are served on.
fn served_on(endpoint: &str, version: &str) -> bool {
    matches!(
        (endpoint, version),
        ("orderDetail" | "orderNumbers", "v1" | "v2")
            | ("updateVendorOrderStatus" | "updateMerchantOrderId" | "createTempCart", "v1")
            | ("setShipmentTracking", "v2")
    )
}

async fn dispatch(
    State(state): State<MockState>,
    Path((version, endpoint)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    if !served_on(&endpoint, &version) {
        return reply(
            StatusCode::NOT_FOUND,
            json!({"error": format!("{endpoint} is not available on {version}")}),
        );
    }
    let store_ok = body.get("store").and_then(Value::as_str) == Some(state.store_id.as_str());
    let secret_ok = body.get("secret").and_then(Value::as_str) == Some(state.secret.as_str());
    if !(store_ok && secret_ok) {
        return reply(StatusCode::UNAUTHORIZED, json!({"error": "invalid store or secret"}));
    }
    debug!(%version, %endpoint, "accepted call");

    let mut store = state.inner.write().await;
    store.calls.push(RecordedCall {
        version,
        endpoint: endpoint.clone(),
        body: body.clone(),
    });

    match endpoint.as_str() {
        "orderDetail" => order_detail(&store, &body),
        "orderNumbers" => order_numbers(&store, &body),
        "updateVendorOrderStatus" => update_order(&mut store, &body, |order, body| {
            let status = text(body, "orderStatus")?;
            order.vendor_status = Some(status.to_string());
            Some(())
        }),
        "updateMerchantOrderId" => update_order(&mut store, &body, |order, body| {
            let merchant_id = text(body, "merchantOrderId")?;
            order.merchant_order_id = Some(merchant_id.to_string());
            Some(())
        }),
        "setShipmentTracking" => update_order(&mut store, &body, |order, body| {
            let list = body.get("trackingList")?.as_array()?;
            for entry in list {
                order.tracking_numbers.push(text(entry, "numbers")?.to_string());
            }
            Some(())
        }),
        "createTempCart" => create_temp_cart(&mut store, body),
        _ => reply(StatusCode::NOT_FOUND, json!({"error": "unknown endpoint"})),
    }
}

fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn order_detail(store: &Store, body: &Value) -> Reply {
    let found = if let Some(id) = text(body, "orderId") {
        store.orders.get(id)
    } else if let Some(reference) = text(body, "referenceId") {
        store.orders.values().find(|o| o.reference_id == reference)
    } else {
        return reply(StatusCode::OK, json!({"error": "orderId or referenceId is required"}));
    };
    match found {
        Some(order) => reply(StatusCode::OK, json!(order)),
        // The hosted API reports lookups that miss with a 200 and an error body.
        None => reply(StatusCode::OK, json!({"error": "order not found"})),
    }
}

fn order_numbers(store: &Store, body: &Value) -> Reply {
    let since: u64 = text(body, "sinceOrderId").and_then(|s| s.parse().ok()).unwrap_or(0);
    let missing_only = body.get("missingMerchantOrderId").and_then(Value::as_bool).unwrap_or(false);
    let with_status = body.get("statuses").and_then(Value::as_bool).unwrap_or(false);

    let orders: Vec<Value> = store
        .orders
        .values()
        .filter(|o| o.order_id.parse::<u64>().map_or(true, |id| id > since))
        .filter(|o| !missing_only || o.merchant_order_id.is_none())
        .map(|o| {
            let mut entry = json!({"orderId": o.order_id});
            if with_status {
                entry["status"] = json!(o.vendor_status);
            }
            entry
        })
        .collect();
    reply(StatusCode::OK, json!({"orders": orders}))
}

fn update_order(store: &mut Store, body: &Value, apply: impl FnOnce(&mut Order, &Value) -> Option<()>) -> Reply {
    let Some(order) = text(body, "orderId").and_then(|id| store.orders.get_mut(id)) else {
        return reply(StatusCode::OK, json!({"success": false, "error": "order not found"}));
    };
    match apply(order, body) {
        Some(()) => reply(StatusCode::OK, json!({"success": true})),
        None => reply(StatusCode::BAD_REQUEST, json!({"success": false, "error": "malformed request"})),
    }
}

fn create_temp_cart(store: &mut Store, cart: Value) -> Reply {
    let has_items = cart
        .get("items")
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty());
    if !has_items {
        return reply(StatusCode::OK, json!({"error": "cart has no items"}));
    }
    let id = Uuid::new_v4();
    store.carts.insert(id, cart);
    reply(StatusCode::OK, json!({"tempCartUUID": id}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_split_matches_hosted_api() {
        assert!(served_on("orderDetail", "v1"));
        assert!(served_on("orderDetail", "v2"));
        assert!(served_on("updateVendorOrderStatus", "v1"));
        assert!(!served_on("updateVendorOrderStatus", "v2"));
        assert!(served_on("setShipmentTracking", "v2"));
        assert!(!served_on("setShipmentTracking", "v1"));
        assert!(!served_on("deleteEverything", "v1"));
    }

    #[test]
    fn order_serializes_camel_case() {
        let order = Order::new("1", "R-1");
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderId"], "1");
        assert_eq!(json["referenceId"], "R-1");
        assert!(json.get("merchantOrderId").is_none());
        assert_eq!(json["trackingNumbers"], json!([]));
    }

    #[test]
    fn seeded_state_has_two_orders() {
        let state = MockState::seeded();
        assert!(state.order_blocking("1001").is_some());
        assert_eq!(
            state.order_blocking("1002").unwrap().merchant_order_id.as_deref(),
            Some("SO-2")
        );
        assert!(state.calls_blocking().is_empty());
    }

    #[test]
    fn temp_cart_requires_items() {
        let mut store = Store::default();
        let (status, Json(body)) = create_temp_cart(&mut store, json!({"storeId": "1"}));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "cart has no items");

        let (_, Json(body)) = create_temp_cart(&mut store, json!({"items": [{"sku": "A"}]}));
        assert!(body["tempCartUUID"].is_string());
        assert_eq!(store.carts.len(), 1);
    }
}
