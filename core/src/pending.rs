//! Single-resolution result for one in-flight call.
//!
//! # Design
//! A `Settler`/`PendingResult` pair over a one-send channel. The settler is
//! consumed by `resolve`/`reject`, so a call can settle at most once by
//! construction; the channel decouples the caller from whichever thread the
//! transport fires its completion callback on.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::RequestError;
use crate::response::Response;

/// The eventual outcome of one request or upload call.
pub struct PendingResult {
    rx: Receiver<Result<Response, RequestError>>,
}

/// Write half of a pending result. Consumed on settlement.
pub(crate) struct Settler {
    tx: Sender<Result<Response, RequestError>>,
}

pub(crate) fn pending() -> (Settler, PendingResult) {
    let (tx, rx) = mpsc::channel();
    (Settler { tx }, PendingResult { rx })
}

impl Settler {
    pub(crate) fn resolve(self, response: Response) {
        // The receiver may already be gone; settlement is best-effort then.
        let _ = self.tx.send(Ok(response));
    }

    pub(crate) fn reject(self, error: RequestError) {
        let _ = self.tx.send(Err(error));
    }
}

impl PendingResult {
    /// Block until the call settles.
    ///
    /// A transport that drops its completion callback without invoking it
    /// (a contract violation) surfaces as `RequestError::TransportDropped`.
    pub fn wait(self) -> Result<Response, RequestError> {
        self.rx.recv().unwrap_or(Err(RequestError::TransportDropped))
    }

    /// Non-blocking poll; `None` while the call is still in flight.
    pub fn try_take(&self) -> Option<Result<Response, RequestError>> {
        self.rx.try_recv().ok()
    }
}
