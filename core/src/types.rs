//! Domain types for the Zonos order and checkout endpoints.
//!
//! # Design
//! Upstream order payloads are not modeled; they are returned as
//! `serde_json::Value`. Only the values this client inspects or produces get
//! a Rust type: identifiers, the vendor status table and the checkout result.
//! Carts stay raw JSON so numeric and nested fields reach upstream as sent.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An order id or merchant order id. Upstream accepts strings or numbers and
/// always receives the string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Numeric(u64),
    Text(String),
}

impl Identifier {
    /// `0` and the empty string do not identify anything.
    pub fn is_blank(&self) -> bool {
        match self {
            Identifier::Numeric(n) => *n == 0,
            Identifier::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{n}"),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier::Numeric(value)
    }
}

impl From<u32> for Identifier {
    fn from(value: u32) -> Self {
        Identifier::Numeric(value.into())
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

/// Query key for `orderDetail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OrderLookup {
    #[serde(rename = "orderId")]
    OrderId(String),
    #[serde(rename = "referenceId")]
    ReferenceId(String),
}

/// Filters for `orderNumbers`. Unset fields are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub through_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_merchant_order_id: Option<bool>,
}

impl OrdersQuery {
    pub fn since_date(mut self, date: impl Into<String>) -> Self {
        self.since_date = Some(date.into());
        self
    }

    pub fn through_date(mut self, date: impl Into<String>) -> Self {
        self.through_date = Some(date.into());
        self
    }

    pub fn since_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.since_order_id = Some(order_id.into());
        self
    }

    pub fn statuses(mut self, include: bool) -> Self {
        self.statuses = Some(include);
        self
    }

    pub fn missing_merchant_order_id(mut self, only_missing: bool) -> Self {
        self.missing_merchant_order_id = Some(only_missing);
        self
    }
}

/// Merchant-side fulfillment stage understood by `updateVendorOrderStatus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Preparing,
    Ready,
    Printed,
    Cancelled,
    Completed,
    /// Sent to the API unchanged.
    Other(String),
}

impl OrderStatus {
    /// Value placed in the `orderStatus` field.
    pub fn upstream_value(&self) -> &str {
        match self {
            OrderStatus::Preparing => "VENDOR_PREPARING_ORDER",
            OrderStatus::Ready => "VENDOR_SHIPMENT_READY",
            OrderStatus::Printed => "VENDOR_LABELS_PRINTED_DATE",
            OrderStatus::Cancelled => "VENDOR_CANCELLATION_REQUEST",
            OrderStatus::Completed => "VENDOR_END_OF_DAY_COMPLETE",
            OrderStatus::Other(raw) => raw,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(key: &str) -> Self {
        match key {
            "preparing" => OrderStatus::Preparing,
            "ready" => OrderStatus::Ready,
            "printed" => OrderStatus::Printed,
            "cancelled" => OrderStatus::Cancelled,
            "completed" => OrderStatus::Completed,
            other => OrderStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(key: String) -> Self {
        OrderStatus::from(key.as_str())
    }
}

/// One entry of `setShipmentTracking`'s `trackingList`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEntry {
    pub numbers: String,
}

/// A checkout cart, forwarded to `createTempCart` exactly as given apart
/// from `storeId`, which is filled in when missing or falsy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    pub fields: Map<String, Value>,
}

impl Cart {
    pub const STORE_ID: &'static str = "storeId";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_store_id(self, store_id: impl Into<Value>) -> Self {
        self.with_field(Self::STORE_ID, store_id)
    }

    pub fn store_id(&self) -> Option<&Value> {
        self.fields.get(Self::STORE_ID)
    }

    /// `null`, `false`, `0`, `""` and an absent key all count as missing.
    pub(crate) fn has_store_id(&self) -> bool {
        self.store_id().is_some_and(is_truthy)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A created temp cart and the hosted checkout page to send the customer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    #[serde(rename = "tempCartUUID")]
    pub temp_cart_uuid: String,
    #[serde(rename = "redirectUrl")]
    pub redirect_url: String,
}

/// Result of `createTempCart`. The two shapes share no fields, so they are
/// kept apart instead of being merged into one JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckoutOutcome {
    Created(CheckoutSession),
    /// The upstream body did not contain a `tempCartUUID`.
    Rejected(Value),
}

impl CheckoutOutcome {
    pub fn session(&self) -> Option<&CheckoutSession> {
        match self {
            CheckoutOutcome::Created(session) => Some(session),
            CheckoutOutcome::Rejected(_) => None,
        }
    }
}
