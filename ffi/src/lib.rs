//! C-ABI wrapper around `zonos-core`.
//!
//! # Overview
//! Exposes the Zonos order and checkout operations through `extern "C"`
//! functions so any language with a C FFI can build requests and parse
//! responses while executing the HTTP round trip with its own stack.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `zonos_build_*` / `zonos_parse_*` mirrors the core API 1:1.
//!   Build functions return null on failure and describe it through an
//!   optional `out_error` envelope (for example a blank order id).
//! - A single `FfiZonosResult` envelope carries payloads as JSON text, tagged
//!   by `FfiDataTag`, and errors as an `FfiErrorCode` plus message.
//! - The C caller owns all returned pointers and must call the matching
//!   `zonos_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, UnwindSafe};

use serde_json::Value;
use zonos_core::{ApiError, Cart, ClientConfig, HttpResponse, OrdersQuery, ZonosClient};

use types::*;

/// Borrow a C string as UTF-8. Null and invalid UTF-8 both read as `None`.
fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Borrow a client handle.
fn client_ref<'a>(client: *const FfiZonosClient) -> Option<&'a ZonosClient> {
    if client.is_null() {
        return None;
    }
    Some(&unsafe { &*client }.inner)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for `account_number` / `api_key` with default endpoints.
///
/// Returns null if either argument is null or if an internal panic occurs.
/// The caller must free the returned pointer with `zonos_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_client_new(account_number: *const c_char, api_key: *const c_char) -> *mut FfiZonosClient {
    catch_unwind(|| {
        let (Some(account), Some(key)) = (read_str(account_number), read_str(api_key)) else {
            return std::ptr::null_mut();
        };
        let client = ZonosClient::new(ClientConfig::new(account, key));
        Box::into_raw(Box::new(FfiZonosClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client from a JSON configuration object, e.g.
/// `{"account_number": 1234, "api_key": "..", "apiVersion": 1}`.
///
/// Returns null if `config_json` is null or does not describe a valid
/// configuration.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_client_from_json(config_json: *const c_char) -> *mut FfiZonosClient {
    catch_unwind(|| {
        let Some(raw) = read_str(config_json) else {
            return std::ptr::null_mut();
        };
        match serde_json::from_str::<ClientConfig>(raw) {
            Ok(config) => Box::into_raw(Box::new(FfiZonosClient {
                inner: ZonosClient::new(config),
            })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `zonos_client_new` or `zonos_client_from_json`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_client_free(client: *mut FfiZonosClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

/// Set the API version used by direct calls and order lookups.
///
/// Returns false if either argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_client_set_version(client: *mut FfiZonosClient, version: *const c_char) -> bool {
    catch_unwind(|| {
        if client.is_null() {
            return false;
        }
        let Some(version) = read_str(version) else {
            return false;
        };
        unsafe { &mut *client }.inner.set_version(version);
        true
    })
    .unwrap_or(false)
}

/// Route every request through `proxy_url`.
///
/// Returns false if either argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_client_set_cors_proxy(client: *mut FfiZonosClient, proxy_url: *const c_char) -> bool {
    catch_unwind(|| {
        if client.is_null() {
            return false;
        }
        let Some(url) = read_str(proxy_url) else {
            return false;
        };
        unsafe { &mut *client }.inner.set_cors_proxy(url);
        true
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------
//
// Every build function takes a trailing `out_error`. It may be null. When it
// is not, it is set to null on success and to an `FfiZonosResult` describing
// the failure otherwise; the caller frees that with `zonos_free_result`.

type BuildResult = Result<zonos_core::HttpRequest, *mut FfiZonosResult>;

/// Require a non-null argument, naming it in the error otherwise.
fn arg<T>(value: Option<T>, name: &str) -> Result<T, *mut FfiZonosResult> {
    value.ok_or_else(|| FfiZonosResult::null_arg(name))
}

/// Report caller-supplied JSON that does not parse.
fn bad_json(err: serde_json::Error) -> *mut FfiZonosResult {
    FfiZonosResult::from_error(ApiError::from(err))
}

/// Shared body of the build functions.
fn build_with(
    out_error: *mut *mut FfiZonosResult,
    name: &str,
    build: impl FnOnce() -> BuildResult + UnwindSafe,
) -> *mut FfiHttpRequest {
    if !out_error.is_null() {
        unsafe { *out_error = std::ptr::null_mut() };
    }
    let outcome = catch_unwind(|| build().map(FfiHttpRequest::from_core))
        .unwrap_or_else(|_| Err(FfiZonosResult::panic(&format!("panic in {name}"))));
    match outcome {
        Ok(req) => req,
        Err(error) if out_error.is_null() => {
            zonos_free_result(error);
            std::ptr::null_mut()
        }
        Err(error) => {
            unsafe { *out_error = error };
            std::ptr::null_mut()
        }
    }
}

/// Build a call to any endpoint on the configured version.
///
/// `body_json` may be null (credentials only); otherwise it must be a JSON
/// object. Returns null on null `client`/`path` or an invalid body.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_build_direct_call(
    client: *const FfiZonosClient,
    path: *const c_char,
    body_json: *const c_char,
    method: FfiHttpMethod,
    out_error: *mut *mut FfiZonosResult,
) -> *mut FfiHttpRequest {
    build_with(out_error, "zonos_build_direct_call", || {
        let client = arg(client_ref(client), "client")?;
        let path = arg(read_str(path), "path")?;
        let body = match read_str(body_json) {
            Some(raw) => serde_json::from_str::<Value>(raw).map_err(bad_json)?,
            None => Value::Null,
        };
        client
            .build_direct_call(path, &body, method.into())
            .map_err(FfiZonosResult::from_error)
    })
}

/// Build an order lookup by Zonos order id, or by reference id when
/// `is_reference_id` is true.
///
/// An empty `id` fails with `FfiErrorCode::MissingOrderId`.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_build_get_order(
    client: *const FfiZonosClient,
    id: *const c_char,
    is_reference_id: bool,
    out_error: *mut *mut FfiZonosResult,
) -> *mut FfiHttpRequest {
    build_with(out_error, "zonos_build_get_order", || {
        let client = arg(client_ref(client), "client")?;
        let id = arg(read_str(id), "id")?;
        client
            .build_get_order(id, is_reference_id)
            .map_err(FfiZonosResult::from_error)
    })
}

/// Build an order listing. `query_json` may be null (no filters) or a JSON
/// object with `sinceDate`, `throughDate`, `sinceOrderId`, `statuses`,
/// `missingMerchantOrderId`.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_build_get_orders(
    client: *const FfiZonosClient,
    query_json: *const c_char,
    out_error: *mut *mut FfiZonosResult,
) -> *mut FfiHttpRequest {
    build_with(out_error, "zonos_build_get_orders", || {
        let client = arg(client_ref(client), "client")?;
        let query = match read_str(query_json) {
            Some(raw) => serde_json::from_str::<OrdersQuery>(raw).map_err(bad_json)?,
            None => OrdersQuery::default(),
        };
        client.build_get_orders(&query).map_err(FfiZonosResult::from_error)
    })
}

/// Build a vendor status update. `status` is one of `preparing`, `ready`,
/// `printed`, `cancelled`, `completed`, or a raw upstream status.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_build_update_order_status(
    client: *const FfiZonosClient,
    order_id: *const c_char,
    status: *const c_char,
    out_error: *mut *mut FfiZonosResult,
) -> *mut FfiHttpRequest {
    build_with(out_error, "zonos_build_update_order_status", || {
        let client = arg(client_ref(client), "client")?;
        let order_id = arg(read_str(order_id), "order_id")?;
        let status = arg(read_str(status), "status")?;
        client
            .build_update_order_status(order_id, status)
            .map_err(FfiZonosResult::from_error)
    })
}

/// Build a merchant order number update.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_build_update_order_number(
    client: *const FfiZonosClient,
    order_id: *const c_char,
    merchant_order_id: *const c_char,
    out_error: *mut *mut FfiZonosResult,
) -> *mut FfiHttpRequest {
    build_with(out_error, "zonos_build_update_order_number", || {
        let client = arg(client_ref(client), "client")?;
        let order_id = arg(read_str(order_id), "order_id")?;
        let merchant_order_id = arg(read_str(merchant_order_id), "merchant_order_id")?;
        client
            .build_update_order_number(order_id, merchant_order_id)
            .map_err(FfiZonosResult::from_error)
    })
}

/// Build a shipment tracking update with a single tracking number.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_build_update_order_tracking(
    client: *const FfiZonosClient,
    order_id: *const c_char,
    tracking_number: *const c_char,
    out_error: *mut *mut FfiZonosResult,
) -> *mut FfiHttpRequest {
    build_with(out_error, "zonos_build_update_order_tracking", || {
        let client = arg(client_ref(client), "client")?;
        let order_id = arg(read_str(order_id), "order_id")?;
        let tracking = arg(read_str(tracking_number), "tracking_number")?;
        client
            .build_update_order_tracking(order_id, tracking)
            .map_err(FfiZonosResult::from_error)
    })
}

/// Build a temp cart creation from a JSON cart object. Every field is
/// forwarded as given; `storeId` defaults to the account number.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_build_create_checkout(
    client: *const FfiZonosClient,
    cart_json: *const c_char,
    out_error: *mut *mut FfiZonosResult,
) -> *mut FfiHttpRequest {
    build_with(out_error, "zonos_build_create_checkout", || {
        let client = arg(client_ref(client), "client")?;
        let raw = arg(read_str(cart_json), "cart_json")?;
        let cart = serde_json::from_str::<Cart>(raw).map_err(bad_json)?;
        client.build_create_checkout(&cart).map_err(FfiZonosResult::from_error)
    })
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as the empty string.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body: read_str(resp.body).unwrap_or("").to_string(),
    }
}

/// Shared body of the parse functions that return upstream JSON.
fn parse_json_with(
    client: *const FfiZonosClient,
    response: *const FfiHttpResponse,
    name: &str,
    parse: fn(&ZonosClient, HttpResponse) -> Result<Value, ApiError>,
) -> *mut FfiZonosResult {
    catch_unwind(|| {
        let Some(client) = client_ref(client) else {
            return FfiZonosResult::null_arg("client");
        };
        if response.is_null() {
            return FfiZonosResult::null_arg("response");
        }
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match parse(client, core_resp) {
            Ok(value) => FfiZonosResult::ok_json(value),
            Err(e) => FfiZonosResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiZonosResult::panic(&format!("panic in {name}")))
}

/// Parse the response to `zonos_build_direct_call`.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_parse_direct_call(
    client: *const FfiZonosClient,
    response: *const FfiHttpResponse,
) -> *mut FfiZonosResult {
    parse_json_with(client, response, "zonos_parse_direct_call", ZonosClient::parse_direct_call)
}

/// Parse the response to `zonos_build_get_order`.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_parse_get_order(
    client: *const FfiZonosClient,
    response: *const FfiHttpResponse,
) -> *mut FfiZonosResult {
    parse_json_with(client, response, "zonos_parse_get_order", ZonosClient::parse_get_order)
}

/// Parse the response to `zonos_build_get_orders`.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_parse_get_orders(
    client: *const FfiZonosClient,
    response: *const FfiHttpResponse,
) -> *mut FfiZonosResult {
    parse_json_with(client, response, "zonos_parse_get_orders", ZonosClient::parse_get_orders)
}

/// Parse the response to `zonos_build_update_order_status`.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_parse_update_order_status(
    client: *const FfiZonosClient,
    response: *const FfiHttpResponse,
) -> *mut FfiZonosResult {
    parse_json_with(
        client,
        response,
        "zonos_parse_update_order_status",
        ZonosClient::parse_update_order_status,
    )
}

/// Parse the response to `zonos_build_update_order_number`.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_parse_update_order_number(
    client: *const FfiZonosClient,
    response: *const FfiHttpResponse,
) -> *mut FfiZonosResult {
    parse_json_with(
        client,
        response,
        "zonos_parse_update_order_number",
        ZonosClient::parse_update_order_number,
    )
}

/// Parse the response to `zonos_build_update_order_tracking`.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_parse_update_order_tracking(
    client: *const FfiZonosClient,
    response: *const FfiHttpResponse,
) -> *mut FfiZonosResult {
    parse_json_with(
        client,
        response,
        "zonos_parse_update_order_tracking",
        ZonosClient::parse_update_order_tracking,
    )
}

/// Parse the response to `zonos_build_create_checkout`.
///
/// `country_code` may be null. Returns `data_tag = CheckoutCreated` with
/// `{"tempCartUUID", "redirectUrl"}` on success, `CheckoutRejected` with the
/// raw upstream body otherwise.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_parse_create_checkout(
    client: *const FfiZonosClient,
    response: *const FfiHttpResponse,
    country_code: *const c_char,
) -> *mut FfiZonosResult {
    catch_unwind(|| {
        let Some(client) = client_ref(client) else {
            return FfiZonosResult::null_arg("client");
        };
        if response.is_null() {
            return FfiZonosResult::null_arg("response");
        }
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match client.parse_create_checkout(core_resp, read_str(country_code)) {
            Ok(outcome) => FfiZonosResult::ok_checkout(outcome),
            Err(e) => FfiZonosResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiZonosResult::panic("panic in zonos_parse_create_checkout"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `zonos_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiZonosResult` returned by any `zonos_parse_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn zonos_free_result(result: *mut FfiZonosResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.json.is_null() {
            drop(unsafe { CString::from_raw(result.json) });
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
