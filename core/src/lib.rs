//! Client core for the Zonos (iGlobalStores) order and checkout API.
//!
//! # Overview
//! `ZonosClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). `ZonosApi`
//! pairs it with a `Transport` for callers that just want one call per
//! endpoint.
//!
//! # Design
//! - Every request is a JSON `POST` carrying the account credentials as
//!   `store` and `secret`.
//! - Endpoints that live on a specific API version name that version per
//!   request instead of rewriting the client's configuration.
//! - Local validation failures, transport failures and non-2xx statuses are
//!   distinct `ApiError` variants. A 2xx body is returned verbatim, even
//!   when it describes an upstream error.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::ZonosApi;
pub use client::ZonosClient;
pub use config::{AccountNumber, ApiVersion, ClientConfig};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Cart, CheckoutOutcome, CheckoutSession, Identifier, OrderStatus, OrdersQuery, TrackingEntry};
