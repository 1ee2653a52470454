//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Upstream payloads cross the
//! boundary as JSON text so hosts can hand them to their own JSON library.

use std::ffi::CString;
use std::os::raw::c_char;

use zonos_core::{ApiError, CheckoutOutcome, HttpMethod};

/// Opaque handle to a `ZonosClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiZonosClient {
    pub(crate) inner: zonos_core::ZonosClient,
}

/// Allocate a C string. Interior NULs cannot come out of serde_json or
/// strings that arrived as C strings, so they are dropped rather than
/// reported.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
            FfiHttpMethod::Put => HttpMethod::Put,
            FfiHttpMethod::Delete => HttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `zonos_build_*` functions. The C caller executes the request
/// and passes the response back through `zonos_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: zonos_core::HttpRequest) -> *mut Self {
        let url = c_string(req.url);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            // Exact-size allocation so `zonos_free_request` can rebuild it
            // with `len == capacity`.
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to a `zonos_parse_*` function. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiZonosResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    MissingOrderId = 1,
    InvalidBody = 2,
    Serialization = 3,
    Deserialization = 4,
    Http = 5,
    Transport = 6,
    Config = 7,
    Panic = 8,
    NullArg = 9,
}

/// What `FfiZonosResult::json` holds.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    /// No payload; `json` is null.
    None = 0,
    /// Upstream JSON, passed through verbatim.
    Json = 1,
    /// `{"tempCartUUID": .., "redirectUrl": ..}`.
    CheckoutCreated = 2,
    /// Upstream `createTempCart` body without a `tempCartUUID`.
    CheckoutRejected = 3,
}

/// Result envelope for all parse operations, and the `out_error` of build
/// operations.
///
/// On success `error_code` is `Ok`, `error_message` is null and `json` holds
/// the payload described by `data_tag`. On failure `error_code` names the
/// category, `error_message` is a human-readable C string and `json` is null.
#[repr(C)]
pub struct FfiZonosResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub json: *mut c_char,
}

impl FfiZonosResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_tag: FfiDataTag,
        json: *mut c_char,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiZonosResult {
            error_code,
            error_message,
            http_status,
            data_tag,
            json,
        }))
    }

    /// Build a success result carrying upstream JSON.
    pub(crate) fn ok_json(value: serde_json::Value) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::Json,
            c_string(value.to_string()),
        )
    }

    /// Build a success result from a checkout outcome, tagged by its shape.
    pub(crate) fn ok_checkout(outcome: CheckoutOutcome) -> *mut Self {
        let tag = match outcome {
            CheckoutOutcome::Created(_) => FfiDataTag::CheckoutCreated,
            CheckoutOutcome::Rejected(_) => FfiDataTag::CheckoutRejected,
        };
        match serde_json::to_string(&outcome) {
            Ok(json) => Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), 0, tag, c_string(json)),
            Err(e) => Self::from_error(ApiError::Serialization(e.to_string())),
        }
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::MissingOrderId => (FfiErrorCode::MissingOrderId, 0),
            ApiError::InvalidBody(_) => (FfiErrorCode::InvalidBody, 0),
            ApiError::Serialization(_) => (FfiErrorCode::Serialization, 0),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::Http { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::Config(_) => (FfiErrorCode::Config, 0),
        };
        Self::boxed(
            error_code,
            c_string(err.to_string()),
            http_status,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            c_string(format!("null argument: {name}")),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Panic,
            c_string(msg.to_string()),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }
}
