//! Classified transport response with a back-reference to its descriptor.

use crate::request::RequestDescriptor;
use crate::transport::ResponseData;
use crate::types::Headers;
use crate::upload::UploadDescriptor;

/// The resolved descriptor a response (or cancellation) refers back to.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Request(RequestDescriptor),
    Upload(UploadDescriptor),
}

impl Descriptor {
    /// Final composed URL of the call this descriptor describes.
    pub fn url(&self) -> &str {
        match self {
            Descriptor::Request(d) => &d.url,
            Descriptor::Upload(d) => &d.url,
        }
    }

    pub fn as_request(&self) -> Option<&RequestDescriptor> {
        match self {
            Descriptor::Request(d) => Some(d),
            Descriptor::Upload(_) => None,
        }
    }

    pub fn as_upload(&self) -> Option<&UploadDescriptor> {
        match self {
            Descriptor::Upload(d) => Some(d),
            Descriptor::Request(_) => None,
        }
    }
}

/// Transport completion payload, extended with the descriptor that
/// produced it. Settles the call through the success hook when the status
/// validator accepts `status_code`, through the failure hook otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status_code: u16,
    pub data: ResponseData,
    pub header: Headers,
    pub config: Descriptor,
}
