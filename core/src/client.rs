//! Client facade: configuration store, hook registry, and the shared
//! completion path that classifies transport responses.
//!
//! # Design
//! `Client` is an `Arc` around its state, so clones are cheap and share
//! the same configuration and interceptors. Per-call work only ever reads snapshot
//! clones of that state: the completion callback owns everything it needs
//! and can fire from any thread without touching the client again.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::Config;
use crate::error::RequestError;
use crate::interceptor::{default_validator, Interceptor, Registry, ResponseHook, StatusValidator};
use crate::pending::Settler;
use crate::response::{Descriptor, Response};
use crate::transport::{Completion, RawResponse, ResponseData, Transport};

struct ClientInner {
    transport: Arc<dyn Transport>,
    config: RwLock<Config>,
    interceptors: RwLock<Registry>,
    validate_status: RwLock<StatusValidator>,
}

/// Configurable request client over an external transport.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Client with default configuration over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, Config::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, config: Config) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                config: RwLock::new(config),
                interceptors: RwLock::new(Registry::default()),
                validate_status: RwLock::new(default_validator()),
            }),
        }
    }

    /// Replace the configuration with `transform(current)`.
    ///
    /// The write lock is held across the transform, so two sequential
    /// calls each see the other's completed result, never an intermediate
    /// state. In-flight calls keep the snapshot taken at their start.
    pub fn set_config(&self, transform: impl FnOnce(Config) -> Config) {
        let mut guard = self.inner.config.write();
        let current = std::mem::take(&mut *guard);
        *guard = transform(current);
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.inner.config.read().clone()
    }

    /// Install the before-request hook; replaces any previous one.
    pub fn intercept_request(&self, interceptor: impl Interceptor + 'static) {
        self.inner.interceptors.write().before = Arc::new(interceptor);
    }

    /// Replace the response hooks that are supplied; a `None` argument
    /// leaves the corresponding stored hook untouched.
    pub fn intercept_response(&self, success: Option<ResponseHook>, fail: Option<ResponseHook>) {
        self.inner.interceptors.write().set_response(success, fail);
    }

    /// Replace the per-client status validator (default: `status == 200`).
    pub fn set_validate_status(&self, validate: impl Fn(u16) -> bool + Send + Sync + 'static) {
        *self.inner.validate_status.write() = Arc::new(validate);
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    pub(crate) fn before_hook(&self) -> Arc<dyn Interceptor> {
        self.inner.interceptors.read().before.clone()
    }

    /// Build the completion callback shared by requests and uploads:
    /// attach the descriptor back-reference, optionally coerce a textual
    /// body to JSON, classify via the status validator, run the matching
    /// response hook and lifecycle observers, and settle exactly once.
    pub(crate) fn completion(
        &self,
        config: &Config,
        final_descriptor: Descriptor,
        settler: Settler,
        coerce_text_json: bool,
    ) -> Completion {
        let validate = self.inner.validate_status.read().clone();
        let (on_success, on_fail) = {
            let registry = self.inner.interceptors.read();
            (registry.on_success.clone(), registry.on_fail.clone())
        };
        let cb_success = config.on_success.clone();
        let cb_fail = config.on_fail.clone();
        let cb_complete = config.on_complete.clone();

        Box::new(move |raw: RawResponse| {
            let mut data = raw.data;
            if coerce_text_json {
                if let ResponseData::Text(text) = &data {
                    // Unparseable text stays text; coercion is best-effort.
                    if let Ok(value) = serde_json::from_str(text) {
                        data = ResponseData::Json(value);
                    }
                }
            }
            let response = Response {
                status_code: raw.status_code,
                data,
                header: raw.header,
                config: final_descriptor,
            };
            if validate(response.status_code) {
                let response = on_success(response);
                if let Some(cb) = &cb_success {
                    cb(&response);
                }
                if let Some(cb) = &cb_complete {
                    cb(&response);
                }
                debug!(status = response.status_code, "call resolved");
                settler.resolve(response);
            } else {
                let response = on_fail(response);
                if let Some(cb) = &cb_fail {
                    cb(&response);
                }
                if let Some(cb) = &cb_complete {
                    cb(&response);
                }
                debug!(status = response.status_code, "call rejected by status validator");
                settler.reject(RequestError::Status(response));
            }
        })
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &*self.inner.config.read())
            .finish_non_exhaustive()
    }
}
