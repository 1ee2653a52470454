//! HTTP request builder and response parser for the Zonos API.
//!
//! # Design
//! `ZonosClient` holds a `ClientConfig` and never touches the network. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`. The caller (a
//! `Transport`, or a foreign host through the FFI crate) executes the
//! round trip in between.
//!
//! Endpoints that only exist on one API version take that version as an
//! argument to `build_versioned_call`. The configured version is never
//! rewritten behind the caller's back, so one client can be shared by
//! concurrent callers without requests picking up another call's version.

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;
use url::Url;

use crate::config::{ApiVersion, ClientConfig};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Cart, CheckoutOutcome, CheckoutSession, Identifier, OrderLookup, OrderStatus, OrdersQuery, TrackingEntry};

pub const ORDER_DETAIL: &str = "orderDetail";
pub const ORDER_NUMBERS: &str = "orderNumbers";
pub const UPDATE_VENDOR_ORDER_STATUS: &str = "updateVendorOrderStatus";
pub const UPDATE_MERCHANT_ORDER_ID: &str = "updateMerchantOrderId";
pub const SET_SHIPMENT_TRACKING: &str = "setShipmentTracking";
pub const CREATE_TEMP_CART: &str = "createTempCart";

/// Synchronous, side-effect free client for the Zonos API.
#[derive(Debug, Clone)]
pub struct ZonosClient {
    config: ClientConfig,
}

impl ZonosClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Change the version used by `build_direct_call`, `build_get_order` and
    /// `build_get_orders`.
    pub fn set_version(&mut self, version: impl Into<ApiVersion>) {
        self.config.set_version(version);
    }

    pub fn set_cors_proxy(&mut self, url: impl Into<String>) {
        self.config.set_cors_proxy(url);
    }

    /// Full URL of `path` on `version`, routed through the CORS proxy when
    /// one is configured.
    pub fn endpoint_url(&self, version: &ApiVersion, path: &str) -> String {
        let base = self.config.base_url_for(version);
        let path = path.trim_start_matches('/');
        match self.config.cors_proxy_url() {
            Some(proxy) => format!("{proxy}/{base}/{path}"),
            None => format!("{base}/{path}"),
        }
    }

    /// Build a call to an arbitrary endpoint on the configured version.
    pub fn build_direct_call<B>(&self, path: &str, body: &B, method: HttpMethod) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        self.build_versioned_call(self.config.api_version(), path, body, method)
    }

    /// Build a call to `path` on `version`.
    ///
    /// `body` must serialize to a JSON object (or `null`). `store` and
    /// `secret` are written over whatever the body already holds under
    /// those keys.
    pub fn build_versioned_call<B>(
        &self,
        version: &ApiVersion,
        path: &str,
        body: &B,
        method: HttpMethod,
    ) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let mut payload = match serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => return Err(ApiError::InvalidBody(json_kind(&other))),
        };
        payload.insert(
            "store".to_string(),
            Value::String(self.config.account_number().to_string()),
        );
        payload.insert("secret".to_string(), Value::String(self.config.api_key().to_string()));

        let body = serde_json::to_string(&payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let url = self.endpoint_url(version, path);
        debug!(%method, %url, "built zonos request");

        Ok(HttpRequest {
            method,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Parse any Zonos response. A 2xx JSON body is returned verbatim, even
    /// when it describes an upstream error.
    pub fn parse_direct_call(&self, response: HttpResponse) -> Result<Value> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Look up one order by Zonos order id, or by the merchant's reference id
    /// when `is_reference_id` is set. A blank id produces no request.
    pub fn build_get_order(&self, id: impl Into<Identifier>, is_reference_id: bool) -> Result<HttpRequest> {
        let id: Identifier = id.into();
        if id.is_blank() {
            return Err(ApiError::MissingOrderId);
        }
        let lookup = if is_reference_id {
            OrderLookup::ReferenceId(id.to_string())
        } else {
            OrderLookup::OrderId(id.to_string())
        };
        self.build_direct_call(ORDER_DETAIL, &lookup, HttpMethod::Post)
    }

    pub fn build_get_orders(&self, query: &OrdersQuery) -> Result<HttpRequest> {
        self.build_direct_call(ORDER_NUMBERS, query, HttpMethod::Post)
    }

    /// `updateVendorOrderStatus` only exists on version 1.
    pub fn build_update_order_status(
        &self,
        order_id: impl Into<Identifier>,
        status: impl Into<OrderStatus>,
    ) -> Result<HttpRequest> {
        let order_id: Identifier = order_id.into();
        let status: OrderStatus = status.into();
        let body = json!({
            "orderId": order_id.to_string(),
            "orderStatus": status.upstream_value(),
        });
        self.build_versioned_call(&ApiVersion::v1(), UPDATE_VENDOR_ORDER_STATUS, &body, HttpMethod::Post)
    }

    /// `updateMerchantOrderId` only exists on version 1.
    pub fn build_update_order_number(
        &self,
        order_id: impl Into<Identifier>,
        merchant_order_id: impl Into<Identifier>,
    ) -> Result<HttpRequest> {
        let order_id: Identifier = order_id.into();
        let merchant_order_id: Identifier = merchant_order_id.into();
        let body = json!({
            "orderId": order_id.to_string(),
            "merchantOrderId": merchant_order_id.to_string(),
        });
        self.build_versioned_call(&ApiVersion::v1(), UPDATE_MERCHANT_ORDER_ID, &body, HttpMethod::Post)
    }

    pub fn build_update_order_tracking(
        &self,
        order_id: impl Into<Identifier>,
        tracking_number: &str,
    ) -> Result<HttpRequest> {
        let order_id: Identifier = order_id.into();
        let tracking_list = [TrackingEntry {
            numbers: tracking_number.to_string(),
        }];
        let body = json!({
            "orderId": order_id.to_string(),
            "trackingList": tracking_list,
        });
        self.build_versioned_call(&ApiVersion::v2(), SET_SHIPMENT_TRACKING, &body, HttpMethod::Post)
    }

    /// Create a temp cart on version 1. The cart's `storeId` defaults to the
    /// account number.
    pub fn build_create_checkout(&self, cart: &Cart) -> Result<HttpRequest> {
        let mut cart = cart.clone();
        if !cart.has_store_id() {
            cart.fields.insert(
                Cart::STORE_ID.to_string(),
                Value::String(self.config.account_number().to_string()),
            );
        }
        self.build_versioned_call(&ApiVersion::v1(), CREATE_TEMP_CART, &cart, HttpMethod::Post)
    }

    pub fn parse_get_order(&self, response: HttpResponse) -> Result<Value> {
        self.parse_direct_call(response)
    }

    pub fn parse_get_orders(&self, response: HttpResponse) -> Result<Value> {
        self.parse_direct_call(response)
    }

    pub fn parse_update_order_status(&self, response: HttpResponse) -> Result<Value> {
        self.parse_direct_call(response)
    }

    pub fn parse_update_order_number(&self, response: HttpResponse) -> Result<Value> {
        self.parse_direct_call(response)
    }

    pub fn parse_update_order_tracking(&self, response: HttpResponse) -> Result<Value> {
        self.parse_direct_call(response)
    }

    /// Turn a `createTempCart` response into a checkout redirect.
    ///
    /// `country_code` preselects the customer's country on the hosted page;
    /// when absent the store's dashboard default applies.
    pub fn parse_create_checkout(
        &self,
        response: HttpResponse,
        country_code: Option<&str>,
    ) -> Result<CheckoutOutcome> {
        let body = self.parse_direct_call(response)?;
        let Some(uuid) = body.get("tempCartUUID").and_then(temp_cart_uuid) else {
            return Ok(CheckoutOutcome::Rejected(body));
        };
        let redirect_url = self.checkout_redirect_url(&uuid, country_code.unwrap_or(""))?;
        Ok(CheckoutOutcome::Created(CheckoutSession {
            temp_cart_uuid: uuid,
            redirect_url,
        }))
    }

    /// `{checkout_url}?tempCartUUID={uuid}&country={country}`.
    pub fn checkout_redirect_url(&self, temp_cart_uuid: &str, country_code: &str) -> Result<String> {
        let mut url = Url::parse(self.config.checkout_url())
            .map_err(|e| ApiError::Config(format!("checkout_url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("tempCartUUID", temp_cart_uuid)
            .append_pair("country", country_code);
        Ok(url.into())
    }
}

/// Map non-success status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn temp_cart_uuid(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
