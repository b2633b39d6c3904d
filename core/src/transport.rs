//! The transport seam: the external collaborator that performs network I/O.
//!
//! # Design
//! The client never opens a socket. It builds `TransportRequest` /
//! `TransportUpload` values and hands them to a [`Transport`] together with
//! a completion callback; the transport must invoke that callback exactly
//! once — synchronously or asynchronously — with a [`RawResponse`]. Timeout
//! handling belongs to the transport (`timeout_ms` is forwarded verbatim),
//! as does any in-flight abort via the returned [`TaskHandle`].

use std::any::Any;
use std::collections::HashMap;

use serde_json::Value;

use crate::types::{Body, DataType, Headers, Method, ResponseType, UploadFile};

/// Completion callback a transport must invoke exactly once per issued call.
pub type Completion = Box<dyn FnOnce(RawResponse) + Send + 'static>;

/// External network capability.
pub trait Transport: Send + Sync {
    fn issue_request(&self, request: TransportRequest, complete: Completion) -> TaskHandle;

    fn issue_upload(&self, upload: TransportUpload, complete: Completion) -> TaskHandle;
}

/// Wire-ready description of one plain request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub url: String,
    pub method: Method,
    pub data: Option<Body>,
    pub header: Headers,
    pub timeout_ms: u64,
    pub data_type: DataType,
    pub response_type: ResponseType,
    /// `None` means the platform default; transports without an SSL
    /// verification knob ignore this.
    pub ssl_verify: Option<bool>,
}

/// Wire-ready description of one multipart file transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportUpload {
    pub url: String,
    pub file_path: String,
    pub name: String,
    pub header: Headers,
    pub form_data: HashMap<String, String>,
    /// Non-empty on platforms that batch several files per call.
    pub files: Vec<UploadFile>,
}

/// Payload a transport delivers to its completion callback.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status_code: u16,
    pub data: ResponseData,
    pub header: Headers,
}

/// Response body in whichever shape the transport produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Text(String),
    Json(Value),
    Bytes(Vec<u8>),
}

impl ResponseData {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(v) => Some(v),
            _ => None,
        }
    }
}

/// Opaque handle to an in-flight transport task.
///
/// The transport decides what lives inside; observers registered through
/// `get_task` can downcast it back to the transport's concrete task type.
pub struct TaskHandle {
    inner: Box<dyn Any + Send>,
}

impl TaskHandle {
    pub fn new<T: Send + 'static>(task: T) -> Self {
        Self { inner: Box::new(task) }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle").finish_non_exhaustive()
    }
}
