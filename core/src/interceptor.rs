//! Hook registry: the before-request seam, the response hook pair, and
//! the status validator.
//!
//! # Design
//! The before-request hook is a trait rather than a closure pair so one
//! registration covers both plain requests and uploads, mirroring how the
//! pipeline itself is shared. Cancellation is a tagged return value
//! (`Outcome::Cancel`), not a side-effecting token: the controller acts on
//! what the hook returns, and the returned descriptor is authoritative —
//! there is no fallback to the pre-hook value.

use std::sync::Arc;

use crate::request::RequestDescriptor;
use crate::response::Response;
use crate::upload::UploadDescriptor;

/// Decision returned by a before-request hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Continue with this descriptor; it is the one issued to the transport.
    Proceed(T),
    /// Abort the call before transport issuance, with a reason.
    Cancel(String),
}

/// Before-request hook for both call kinds. Default methods pass the
/// descriptor through unchanged.
pub trait Interceptor: Send + Sync {
    fn before_request(&self, descriptor: RequestDescriptor) -> Outcome<RequestDescriptor> {
        Outcome::Proceed(descriptor)
    }

    fn before_upload(&self, descriptor: UploadDescriptor) -> Outcome<UploadDescriptor> {
        Outcome::Proceed(descriptor)
    }
}

/// Identity interceptor installed until the caller registers one.
pub(crate) struct Passthrough;

impl Interceptor for Passthrough {}

/// Transforms a classified response before it settles the pending result.
pub type ResponseHook = Arc<dyn Fn(Response) -> Response + Send + Sync>;

/// Per-client success predicate over the response status code.
pub type StatusValidator = Arc<dyn Fn(u16) -> bool + Send + Sync>;

pub(crate) fn default_validator() -> StatusValidator {
    Arc::new(|status_code| status_code == 200)
}

/// Holds at most one before hook and one response hook pair; registering
/// replaces the previous entry (last registration wins).
pub(crate) struct Registry {
    pub before: Arc<dyn Interceptor>,
    pub on_success: ResponseHook,
    pub on_fail: ResponseHook,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            before: Arc::new(Passthrough),
            on_success: Arc::new(|response| response),
            on_fail: Arc::new(|response| response),
        }
    }
}

impl Registry {
    /// Replace the response hooks that are supplied; a `None` argument
    /// leaves the corresponding stored hook untouched.
    pub(crate) fn set_response(&mut self, success: Option<ResponseHook>, fail: Option<ResponseHook>) {
        if let Some(hook) = success {
            self.on_success = hook;
        }
        if let Some(hook) = fail {
            self.on_fail = hook;
        }
    }
}
