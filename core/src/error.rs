//! Error types for the request pipeline.
//!
//! # Design
//! Every failure is local to one call and surfaces as the rejection of
//! that call's pending result; there is no retry and nothing fatal. A
//! non-accepted status is not an exception — the (post-failure-hook)
//! response itself is the rejection value, so callers can read its body
//! and headers the same way they would on success.

use std::fmt;

use crate::response::{Descriptor, Response};

/// Rejection values produced by `request` and `upload` calls.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// The before-request hook cancelled the call; the transport was never
    /// invoked. `config` is the descriptor as it stood at cancel time.
    Cancelled { err_msg: String, config: Descriptor },

    /// The transport completed, but the status validator rejected the
    /// status code. Carries the response after the failure hook ran.
    Status(Response),

    /// The transport dropped its completion callback without invoking it,
    /// violating the exactly-once completion contract.
    TransportDropped,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Cancelled { err_msg, config } => {
                write!(f, "cancelled before transport ({}): {err_msg}", config.url())
            }
            RequestError::Status(response) => {
                write!(f, "status {} rejected by validator", response.status_code)
            }
            RequestError::TransportDropped => {
                write!(f, "transport dropped the completion callback")
            }
        }
    }
}

impl std::error::Error for RequestError {}
