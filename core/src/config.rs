//! Global default configuration for a client instance.
//!
//! # Design
//! `Config` is a plain value. The client keeps it behind a lock and hands
//! out snapshot clones at call start; request execution never reads it
//! live, so a `set_config` issued mid-flight cannot affect requests that
//! already resolved their descriptor.

use std::fmt;
use std::sync::Arc;

use crate::response::Response;
use crate::types::{Body, Custom, DataType, Headers, Method, ResponseType};
use crate::upload::TaskHook;

/// Default request timeout, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Observer invoked with the classified response, outside the settle path.
pub type LifecycleHook = Arc<dyn Fn(&Response) + Send + Sync>;

/// Client-wide defaults merged under per-call options.
#[derive(Clone)]
pub struct Config {
    /// Prefix for relative request paths.
    pub base_url: String,
    /// Default headers sent with every call.
    pub header: Headers,
    /// Default request body.
    pub data: Option<Body>,
    pub method: Method,
    /// `Json` asks the transport to parse response bodies once.
    pub data_type: DataType,
    pub response_type: ResponseType,
    pub timeout_ms: u64,
    /// Whether the transport should verify SSL certificates.
    pub ssl_verify: bool,
    /// Free-form per-request metadata, shallow-merged with per-call values.
    pub custom: Custom,
    /// Called after the success hook on every successful call.
    pub on_success: Option<LifecycleHook>,
    /// Called after the failure hook when status validation rejects.
    pub on_fail: Option<LifecycleHook>,
    /// Called after either outcome, success or failure.
    pub on_complete: Option<LifecycleHook>,
    /// Default task observer for uploads without a per-call `get_task`.
    pub get_task: Option<TaskHook>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            header: Headers::new(),
            data: None,
            method: Method::Get,
            data_type: DataType::Json,
            response_type: ResponseType::Text,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            ssl_verify: true,
            custom: Custom::new(),
            on_success: None,
            on_fail: None,
            on_complete: None,
            get_task: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("header", &self.header)
            .field("data", &self.data)
            .field("method", &self.method)
            .field("data_type", &self.data_type)
            .field("response_type", &self.response_type)
            .field("timeout_ms", &self.timeout_ms)
            .field("ssl_verify", &self.ssl_verify)
            .field("custom", &self.custom)
            .field("on_success", &self.on_success.is_some())
            .field("on_fail", &self.on_fail.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("get_task", &self.get_task.is_some())
            .finish()
    }
}
