//! Per-call options, descriptor resolution, and the plain-request entry
//! points on [`Client`].
//!
//! # Design
//! Every overridable field of `RequestOptions` is an `Option`, so the
//! merge is presence-aware: a caller-supplied value wins even when it is
//! "falsy" (an empty header map or string is a deliberate override, not an
//! omission), and `None` falls back to the configuration default. The
//! descriptor's `url` is fully composed (base + path + encoded params) at
//! resolution time, before the before-request hook runs; a hook that wants
//! a different target rewrites `url` itself.

use tracing::debug;

use crate::client::Client;
use crate::config::Config;
use crate::error::RequestError;
use crate::interceptor::Outcome;
use crate::pending::{pending, PendingResult};
use crate::response::Descriptor;
use crate::transport::TransportRequest;
use crate::types::{Body, Custom, DataType, Headers, Method, Params, ResponseType};
use crate::url;

/// Caller-supplied options for one request. `url` is required; everything
/// else defaults to the client configuration when absent.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub url: String,
    pub base_url: Option<String>,
    pub method: Option<Method>,
    pub data: Option<Body>,
    pub params: Option<Params>,
    pub header: Option<Headers>,
    pub timeout_ms: Option<u64>,
    pub data_type: Option<DataType>,
    pub response_type: Option<ResponseType>,
    pub ssl_verify: Option<bool>,
    pub custom: Option<Custom>,
}

impl RequestOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Fully resolved description of one request, as seen by the
/// before-request hook and attached to the response as `config`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Final composed URL: base-merged, query parameters already encoded.
    pub url: String,
    pub base_url: String,
    pub method: Method,
    pub data: Option<Body>,
    /// Query parameters, retained for inspection; already part of `url`.
    pub params: Params,
    pub header: Headers,
    pub timeout_ms: u64,
    pub data_type: DataType,
    pub response_type: ResponseType,
    pub ssl_verify: bool,
    /// Shallow merge of configuration and per-call metadata; per-call
    /// entries override matching keys.
    pub custom: Custom,
}

impl RequestDescriptor {
    /// Merge `options` over a configuration snapshot, caller value winning
    /// wherever one was supplied.
    pub fn resolve(options: RequestOptions, config: &Config) -> Self {
        let base_url = options.base_url.unwrap_or_else(|| config.base_url.clone());
        let params = options.params.unwrap_or_default();
        let merged_url = url::merge_url(&options.url, &base_url, &params);

        let mut custom = config.custom.clone();
        if let Some(per_call) = options.custom {
            custom.extend(per_call);
        }

        Self {
            url: merged_url,
            base_url,
            method: options.method.unwrap_or(config.method),
            data: options.data.or_else(|| config.data.clone()),
            params,
            header: options.header.unwrap_or_else(|| config.header.clone()),
            timeout_ms: options.timeout_ms.unwrap_or(config.timeout_ms),
            data_type: options.data_type.unwrap_or(config.data_type),
            response_type: options.response_type.unwrap_or(config.response_type),
            ssl_verify: options.ssl_verify.unwrap_or(config.ssl_verify),
            custom,
        }
    }

    pub(crate) fn to_transport(&self) -> TransportRequest {
        TransportRequest {
            url: self.url.clone(),
            method: self.method,
            data: self.data.clone(),
            header: self.header.clone(),
            timeout_ms: self.timeout_ms,
            data_type: self.data_type,
            response_type: self.response_type,
            ssl_verify: Some(self.ssl_verify),
        }
    }
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self::resolve(RequestOptions::default(), &Config::default())
    }
}

impl Client {
    /// Run one request through the full pipeline: merge, hook, transport,
    /// classification. Exactly one of {success, failure, cancellation}
    /// settles the returned result.
    pub fn request(&self, options: RequestOptions) -> PendingResult {
        let config = self.config();
        let descriptor = RequestDescriptor::resolve(options, &config);
        let (settler, result) = pending();

        let before = self.before_hook();
        let at_hook = descriptor.clone();
        match before.before_request(descriptor) {
            Outcome::Cancel(reason) => {
                debug!(url = %at_hook.url, %reason, "request cancelled by interceptor");
                settler.reject(RequestError::Cancelled {
                    err_msg: reason,
                    config: Descriptor::Request(at_hook),
                });
            }
            Outcome::Proceed(final_descriptor) => {
                debug!(
                    url = %final_descriptor.url,
                    method = final_descriptor.method.as_str(),
                    "issuing request"
                );
                let wire = final_descriptor.to_transport();
                let complete =
                    self.completion(&config, Descriptor::Request(final_descriptor), settler, false);
                let _task = self.transport().issue_request(wire, complete);
            }
        }
        result
    }

    /// GET convenience wrapper: forwards `params` into the query string.
    pub fn get(&self, url: impl Into<String>, params: Params) -> PendingResult {
        self.request(RequestOptions {
            method: Some(Method::Get),
            params: Some(params),
            ..RequestOptions::new(url)
        })
    }

    /// POST convenience wrapper: `data` becomes the body, `extra` supplies
    /// any further overrides (its `url`/`method`/`data` are ignored).
    pub fn post(&self, url: impl Into<String>, data: Body, extra: RequestOptions) -> PendingResult {
        self.request(RequestOptions {
            url: url.into(),
            method: Some(Method::Post),
            data: Some(data),
            ..extra
        })
    }
}
