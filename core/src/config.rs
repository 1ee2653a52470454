//! Connection configuration for a `ZonosClient`.
//!
//! # Design
//! The base URL is never stored next to the version it was derived from.
//! `api_base_url()` computes it from the current `api_version` on every call,
//! so the two cannot drift apart. An explicit override is honored only for
//! the configured version; `set_version` drops it, matching how the hosted
//! API clients have always behaved.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

pub const DEFAULT_API_HOST: &str = "https://api.iglobalstores.com";
pub const DEFAULT_CHECKOUT_URL: &str = "https://checkout.iglobalstores.com/";
pub const DEFAULT_API_VERSION: &str = "2";

/// JSON scalar accepted wherever the upstream API takes "string or number".
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// Merchant account number, sent as `store` on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StringOrNumber", into = "String")]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<StringOrNumber> for AccountNumber {
    fn from(value: StringOrNumber) -> Self {
        AccountNumber(value.into())
    }
}

impl From<AccountNumber> for String {
    fn from(value: AccountNumber) -> Self {
        value.0
    }
}

impl From<&str> for AccountNumber {
    fn from(value: &str) -> Self {
        AccountNumber(value.to_string())
    }
}

impl From<String> for AccountNumber {
    fn from(value: String) -> Self {
        AccountNumber(value)
    }
}

impl From<u64> for AccountNumber {
    fn from(value: u64) -> Self {
        AccountNumber(value.to_string())
    }
}

impl std::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// API version tag, rendered as the `v{N}` path segment. Not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StringOrNumber", into = "String")]
pub struct ApiVersion(String);

impl ApiVersion {
    pub fn v1() -> Self {
        ApiVersion("1".to_string())
    }

    pub fn v2() -> Self {
        ApiVersion("2".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        ApiVersion(DEFAULT_API_VERSION.to_string())
    }
}

impl From<StringOrNumber> for ApiVersion {
    fn from(value: StringOrNumber) -> Self {
        ApiVersion(value.into())
    }
}

impl From<ApiVersion> for String {
    fn from(value: ApiVersion) -> Self {
        value.0
    }
}

impl From<&str> for ApiVersion {
    fn from(value: &str) -> Self {
        ApiVersion(value.to_string())
    }
}

impl From<String> for ApiVersion {
    fn from(value: String) -> Self {
        ApiVersion(value)
    }
}

impl From<u32> for ApiVersion {
    fn from(value: u32) -> Self {
        ApiVersion(value.to_string())
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

fn default_checkout_url() -> String {
    DEFAULT_CHECKOUT_URL.to_string()
}

/// Account credentials and endpoint selection for one client.
///
/// Deserializes from either the Rust field names or the names used by the
/// JavaScript client (`account_number`, `api_key`, `apiUrl`, `apiVersion`,
/// `corsProxy`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(alias = "accountNumber")]
    account_number: AccountNumber,
    #[serde(alias = "apiKey")]
    api_key: String,
    #[serde(default, alias = "apiVersion")]
    api_version: ApiVersion,
    #[serde(default, alias = "apiUrl", alias = "apiBaseUrl", skip_serializing_if = "Option::is_none")]
    api_base_url: Option<String>,
    #[serde(default = "default_api_host", alias = "apiHost")]
    api_host: String,
    #[serde(default, alias = "corsProxy", alias = "corsProxyUrl", skip_serializing_if = "Option::is_none")]
    cors_proxy_url: Option<String>,
    #[serde(default = "default_checkout_url", alias = "checkoutUrl")]
    checkout_url: String,
    #[serde(default, alias = "timeoutMs", skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn new(account_number: impl Into<AccountNumber>, api_key: impl Into<String>) -> Self {
        Self {
            account_number: account_number.into(),
            api_key: api_key.into(),
            api_version: ApiVersion::default(),
            api_base_url: None,
            api_host: default_api_host(),
            cors_proxy_url: None,
            checkout_url: default_checkout_url(),
            timeout_ms: None,
        }
    }

    /// Load configuration from `ZONOS_*` environment variables.
    ///
    /// `ZONOS_ACCOUNT_NUMBER` and `ZONOS_API_KEY` are required. Optional:
    /// `ZONOS_API_VERSION`, `ZONOS_API_URL`, `ZONOS_API_HOST`,
    /// `ZONOS_CORS_PROXY`, `ZONOS_CHECKOUT_URL`, `ZONOS_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(required("ZONOS_ACCOUNT_NUMBER")?, required("ZONOS_API_KEY")?);
        if let Some(version) = lookup("ZONOS_API_VERSION") {
            config.api_version = version.into();
        }
        if let Some(host) = lookup("ZONOS_API_HOST") {
            config.api_host = host;
        }
        config.api_base_url = lookup("ZONOS_API_URL");
        config.cors_proxy_url = lookup("ZONOS_CORS_PROXY");
        if let Some(url) = lookup("ZONOS_CHECKOUT_URL") {
            config.checkout_url = url;
        }
        if let Some(ms) = lookup("ZONOS_TIMEOUT_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|e| ApiError::Config(format!("ZONOS_TIMEOUT_MS: {e}")))?;
            if ms == 0 {
                return Err(ApiError::Config("ZONOS_TIMEOUT_MS must be greater than zero".to_string()));
            }
            config.timeout_ms = Some(ms);
        }
        Ok(config)
    }

    pub fn with_api_version(mut self, version: impl Into<ApiVersion>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Use `url` verbatim as the base URL for the configured version.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Replace the host that versioned base URLs are derived from.
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    pub fn with_cors_proxy(mut self, url: impl Into<String>) -> Self {
        self.cors_proxy_url = Some(url.into());
        self
    }

    pub fn with_checkout_url(mut self, url: impl Into<String>) -> Self {
        self.checkout_url = url.into();
        self
    }

    /// Bound every call by `timeout`, kept at millisecond precision.
    ///
    /// Sub-millisecond remainders round up, so a non-zero timeout never
    /// collapses to zero. `Duration::ZERO` removes the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = match timeout.as_nanos().div_ceil(1_000_000) {
            0 => None,
            ms => Some(u64::try_from(ms).unwrap_or(u64::MAX)),
        };
        self
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    pub fn cors_proxy_url(&self) -> Option<&str> {
        self.cors_proxy_url.as_deref()
    }

    pub fn checkout_url(&self) -> &str {
        &self.checkout_url
    }

    /// A stored zero reads as no timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis)
    }

    /// Base URL for the configured version.
    pub fn api_base_url(&self) -> String {
        self.base_url_for(&self.api_version)
    }

    /// Base URL for `version`: the explicit override when `version` is the
    /// configured one, otherwise `{api_host}/v{version}`.
    pub fn base_url_for(&self, version: &ApiVersion) -> String {
        match &self.api_base_url {
            Some(url) if *version == self.api_version => url.trim_end_matches('/').to_string(),
            _ => format!("{}/v{}", self.api_host.trim_end_matches('/'), version),
        }
    }

    /// Overwrite the version and re-derive the base URL from it.
    pub fn set_version(&mut self, version: impl Into<ApiVersion>) {
        self.api_version = version.into();
        self.api_base_url = None;
    }

    pub fn set_cors_proxy(&mut self, url: impl Into<String>) {
        self.cors_proxy_url = Some(url.into());
    }
}
