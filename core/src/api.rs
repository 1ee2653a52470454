//! One-call-per-method facade over `ZonosClient` and a `Transport`.
//!
//! Each method builds the request, executes it and parses the response.
//! Failures are logged before they are handed back, so callers that only
//! propagate the error still leave a trace.

use serde::Serialize;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::client::ZonosClient;
use crate::config::{ApiVersion, ClientConfig};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Cart, CheckoutOutcome, Identifier, OrderStatus, OrdersQuery};

pub struct ZonosApi<T = UreqTransport> {
    client: ZonosClient,
    transport: T,
}

impl ZonosApi<UreqTransport> {
    /// Use the blocking `ureq` transport with the configured timeout.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::with_timeout(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> ZonosApi<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: ZonosClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &ZonosClient {
        &self.client
    }

    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    pub fn set_version(&mut self, version: impl Into<ApiVersion>) {
        self.client.set_version(version);
    }

    pub fn set_cors_proxy(&mut self, url: impl Into<String>) {
        self.client.set_cors_proxy(url);
    }

    #[instrument(skip(self, body), fields(account = %self.config().account_number()))]
    pub fn direct_api_call<B>(&self, path: &str, body: &B, method: HttpMethod) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let request = self.client.build_direct_call(path, body, method);
        self.round_trip(request, |c, r| c.parse_direct_call(r))
    }

    #[instrument(skip(self, id))]
    pub fn get_order(&self, id: impl Into<Identifier>, is_reference_id: bool) -> Result<Value> {
        let request = self.client.build_get_order(id, is_reference_id);
        self.round_trip(request, |c, r| c.parse_get_order(r))
    }

    #[instrument(skip(self))]
    pub fn get_orders(&self, query: &OrdersQuery) -> Result<Value> {
        let request = self.client.build_get_orders(query);
        self.round_trip(request, |c, r| c.parse_get_orders(r))
    }

    #[instrument(skip_all)]
    pub fn update_order_status(
        &self,
        order_id: impl Into<Identifier>,
        status: impl Into<OrderStatus>,
    ) -> Result<Value> {
        let request = self.client.build_update_order_status(order_id, status);
        self.round_trip(request, |c, r| c.parse_update_order_status(r))
    }

    #[instrument(skip_all)]
    pub fn update_order_number(
        &self,
        order_id: impl Into<Identifier>,
        merchant_order_id: impl Into<Identifier>,
    ) -> Result<Value> {
        let request = self.client.build_update_order_number(order_id, merchant_order_id);
        self.round_trip(request, |c, r| c.parse_update_order_number(r))
    }

    #[instrument(skip(self, order_id))]
    pub fn update_order_tracking(&self, order_id: impl Into<Identifier>, tracking_number: &str) -> Result<Value> {
        let request = self.client.build_update_order_tracking(order_id, tracking_number);
        self.round_trip(request, |c, r| c.parse_update_order_tracking(r))
    }

    /// Create a temp cart and, when upstream accepts it, the hosted checkout
    /// redirect. `country_code` preselects the customer's country.
    #[instrument(skip(self, cart))]
    pub fn create_checkout(&self, cart: &Cart, country_code: Option<&str>) -> Result<CheckoutOutcome> {
        let request = self.client.build_create_checkout(cart);
        let outcome = self.round_trip(request, |c, r| c.parse_create_checkout(r, country_code))?;
        if let CheckoutOutcome::Rejected(body) = &outcome {
            warn!(%body, "zonos rejected temp cart");
        }
        Ok(outcome)
    }

    fn round_trip<R>(
        &self,
        request: Result<HttpRequest>,
        parse: impl FnOnce(&ZonosClient, HttpResponse) -> Result<R>,
    ) -> Result<R> {
        let result = request
            .and_then(|req| self.transport.execute(req))
            .and_then(|resp| parse(&self.client, resp));
        if let Err(e) = &result {
            warn!(error = %e, "zonos call failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::error::ApiError;

    /// Records requests and replies with a fixed response.
    struct Recorder {
        status: u16,
        body: String,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Recorder {
        fn replying(status: u16, body: Value) -> Self {
            Self {
                status,
                body: body.to_string(),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn last_body(&self) -> Value {
            let seen = self.seen.borrow();
            serde_json::from_str(seen.last().unwrap().body.as_deref().unwrap()).unwrap()
        }
    }

    impl Transport for Recorder {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.seen.borrow_mut().push(request);
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    fn api(transport: &Recorder) -> ZonosApi<&Recorder> {
        ZonosApi::with_transport(ClientConfig::new(1234u64, "s3cret"), transport)
    }

    #[test]
    fn get_order_blank_id_makes_no_request() {
        let recorder = Recorder::replying(200, json!({}));
        let err = api(&recorder).get_order(0u64, false).unwrap_err();
        assert!(matches!(err, ApiError::MissingOrderId));
        assert!(recorder.seen.borrow().is_empty());
    }

    #[test]
    fn get_order_returns_upstream_json() {
        let recorder = Recorder::replying(200, json!({"orderId": "42", "status": "OPEN"}));
        let order = api(&recorder).get_order("42", false).unwrap();
        assert_eq!(order["status"], "OPEN");
        assert_eq!(recorder.last_body()["orderId"], "42");
    }

    #[test]
    fn update_order_status_leaves_configured_version_alone() {
        let recorder = Recorder::replying(200, json!({"success": true}));
        let api = api(&recorder);
        api.update_order_status(7u64, "cancelled").unwrap();
        assert_eq!(recorder.last_body()["orderStatus"], "VENDOR_CANCELLATION_REQUEST");
        assert_eq!(api.config().api_version().as_str(), "2");

        api.get_orders(&OrdersQuery::default()).unwrap();
        let seen = recorder.seen.borrow();
        assert_eq!(seen[0].url, "https://api.iglobalstores.com/v1/updateVendorOrderStatus");
        assert_eq!(seen[1].url, "https://api.iglobalstores.com/v2/orderNumbers");
    }

    #[test]
    fn create_checkout_builds_redirect() {
        let recorder = Recorder::replying(200, json!({"tempCartUUID": "abc"}));
        let outcome = api(&recorder).create_checkout(&Cart::new(), Some("US")).unwrap();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "tempCartUUID": "abc",
                "redirectUrl": "https://checkout.iglobalstores.com/?tempCartUUID=abc&country=US",
            })
        );
        assert_eq!(recorder.last_body()["storeId"], "1234");
    }

    #[test]
    fn create_checkout_rejection_is_data() {
        let recorder = Recorder::replying(200, json!({"error": "bad cart"}));
        let outcome = api(&recorder).create_checkout(&Cart::new(), None).unwrap();
        assert_eq!(outcome, CheckoutOutcome::Rejected(json!({"error": "bad cart"})));
    }

    #[test]
    fn transport_failure_is_distinguishable_from_api_error() {
        let api = ZonosApi::with_transport(ClientConfig::new(1u64, "k"), Unreachable);
        let err = api.update_order_tracking(5u64, "1Z").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));

        let recorder = Recorder::replying(401, json!({"error": "bad secret"}));
        let err = ZonosApi::with_transport(ClientConfig::new(1u64, "k"), &recorder)
            .update_order_number(5u64, 6u64)
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn direct_api_call_uses_configured_version() {
        let recorder = Recorder::replying(200, json!({"ok": true}));
        let mut api = api(&recorder);
        api.set_version(1u32);
        api.set_cors_proxy("http://proxy.local");
        api.direct_api_call("customEndpoint", &json!({"a": 1}), HttpMethod::Post)
            .unwrap();
        assert_eq!(
            recorder.seen.borrow()[0].url,
            "http://proxy.local/https://api.iglobalstores.com/v1/customEndpoint"
        );
    }
}
