//! Configurable request client core over a host-provided transport.
//!
//! # Overview
//! Merges per-call options with global defaults, lets a before-request
//! hook inspect, rewrite, or cancel the resulting descriptor, hands the
//! call to an external [`Transport`], and classifies the completion into
//! success or failure through a response hook pair. Uploads share the same
//! pipeline with their own header and body-coercion rules.
//!
//! # Design
//! - The crate never touches the network (host-does-IO pattern): all I/O
//!   goes through the `Transport` trait, which invokes a completion
//!   callback exactly once per issued call.
//! - Each call yields a [`PendingResult`], a single-resolution future
//!   settled by exactly one of the success, failure, or cancellation paths.
//! - Configuration is a value: snapshotted at call start, replaced
//!   atomically via `Client::set_config`, never referenced live in flight.
//! - Merging is presence-aware — an explicitly supplied empty value is an
//!   override, not an omission.

pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod pending;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;
pub mod upload;
pub mod url;

pub use client::Client;
pub use config::{Config, LifecycleHook, DEFAULT_TIMEOUT_MS};
pub use error::RequestError;
pub use interceptor::{Interceptor, Outcome, ResponseHook, StatusValidator};
pub use pending::PendingResult;
pub use request::{RequestDescriptor, RequestOptions};
pub use response::{Descriptor, Response};
pub use transport::{
    Completion, RawResponse, ResponseData, TaskHandle, Transport, TransportRequest, TransportUpload,
};
pub use types::{Body, Custom, DataType, Headers, Method, Params, ResponseType, UploadFile};
pub use upload::{TaskHook, UploadDescriptor, UploadSpec};
