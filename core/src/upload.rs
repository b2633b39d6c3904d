//! Multipart file transmission through the shared pipeline.
//!
//! # Design
//! Uploads reuse the request orchestration (merge, before hook, transport,
//! classification) with three differences: the header default is the
//! global header with every case-variant of `content-type` removed (the
//! multipart boundary header is the transport's to set), a textual
//! response body is coerced to JSON before classification, and an optional
//! `get_task` observer receives the transport's task handle outside the
//! settle path.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::client::Client;
use crate::config::Config;
use crate::error::RequestError;
use crate::interceptor::Outcome;
use crate::pending::{pending, PendingResult};
use crate::response::Descriptor;
use crate::transport::{TaskHandle, TransportUpload};
use crate::types::{Custom, Headers, Params, UploadFile};
use crate::url;

/// Observer handed the transport task handle and the final descriptor
/// right after upload issuance. Fire-and-forget; in-flight abort through
/// the handle is between the observer and the transport.
pub type TaskHook = Arc<dyn Fn(&TaskHandle, &UploadDescriptor) + Send + Sync>;

/// Caller-supplied description of one upload.
#[derive(Clone, Default)]
pub struct UploadSpec {
    pub file_path: String,
    /// Form field name the file is posted under.
    pub name: String,
    /// Overrides the stripped global header wholesale when set.
    pub header: Option<Headers>,
    pub form_data: HashMap<String, String>,
    pub params: Params,
    pub custom: Custom,
    /// Multi-file list for platforms that batch several files per call.
    pub files: Vec<UploadFile>,
    pub get_task: Option<TaskHook>,
}

impl UploadSpec {
    pub fn new(file_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for UploadSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadSpec")
            .field("file_path", &self.file_path)
            .field("name", &self.name)
            .field("header", &self.header)
            .field("form_data", &self.form_data)
            .field("params", &self.params)
            .field("custom", &self.custom)
            .field("files", &self.files)
            .field("get_task", &self.get_task.is_some())
            .finish()
    }
}

/// Fully resolved description of one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadDescriptor {
    /// Final composed URL, query parameters already encoded.
    pub url: String,
    pub base_url: String,
    pub file_path: String,
    pub name: String,
    pub header: Headers,
    pub form_data: HashMap<String, String>,
    pub params: Params,
    pub custom: Custom,
    pub files: Vec<UploadFile>,
}

impl UploadDescriptor {
    /// Merge `spec` over a configuration snapshot. Returns the descriptor
    /// and the effective task observer (per-call value, else the
    /// configuration default).
    pub(crate) fn resolve(
        url: &str,
        spec: UploadSpec,
        config: &Config,
    ) -> (Self, Option<TaskHook>) {
        let header = spec
            .header
            .unwrap_or_else(|| strip_content_type(&config.header));

        let mut custom = config.custom.clone();
        custom.extend(spec.custom);

        let descriptor = Self {
            url: url::merge_url(url, &config.base_url, &spec.params),
            base_url: config.base_url.clone(),
            file_path: spec.file_path,
            name: spec.name,
            header,
            form_data: spec.form_data,
            params: spec.params,
            custom,
            files: spec.files,
        };
        let get_task = spec.get_task.or_else(|| config.get_task.clone());
        (descriptor, get_task)
    }

    pub(crate) fn to_transport(&self) -> TransportUpload {
        TransportUpload {
            url: self.url.clone(),
            file_path: self.file_path.clone(),
            name: self.name.clone(),
            header: self.header.clone(),
            form_data: self.form_data.clone(),
            files: self.files.clone(),
        }
    }
}

/// Global header minus any case-variant of `content-type`; multipart
/// requests must let the transport set its own boundary header.
fn strip_content_type(header: &Headers) -> Headers {
    header
        .iter()
        .filter(|(key, _)| !key.eq_ignore_ascii_case("content-type"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

impl Client {
    /// Transmit a file through the shared pipeline.
    pub fn upload(&self, url: impl Into<String>, spec: UploadSpec) -> PendingResult {
        let config = self.config();
        let url = url.into();
        let (descriptor, get_task) = UploadDescriptor::resolve(&url, spec, &config);
        let (settler, result) = pending();

        let before = self.before_hook();
        let at_hook = descriptor.clone();
        match before.before_upload(descriptor) {
            Outcome::Cancel(reason) => {
                debug!(url = %at_hook.url, %reason, "upload cancelled by interceptor");
                settler.reject(RequestError::Cancelled {
                    err_msg: reason,
                    config: Descriptor::Upload(at_hook),
                });
            }
            Outcome::Proceed(final_descriptor) => {
                debug!(
                    url = %final_descriptor.url,
                    file_path = %final_descriptor.file_path,
                    "issuing upload"
                );
                let wire = final_descriptor.to_transport();
                let complete = self.completion(
                    &config,
                    Descriptor::Upload(final_descriptor.clone()),
                    settler,
                    true,
                );
                let task = self.transport().issue_upload(wire, complete);
                if let Some(hook) = get_task {
                    hook(&task, &final_descriptor);
                }
            }
        }
        result
    }
}
