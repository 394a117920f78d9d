use http::{HeaderMap, StatusCode};

use crate::protocol::Version;

/// A parsed response head, handed to the embedder by `on_server_response`.
///
/// The reason phrase is kept verbatim from the wire rather than recomputed
/// from the status code, so a forwarding proxy reproduces it byte for byte.
#[derive(Debug)]
pub struct Response {
    version: Version,
    status: StatusCode,
    reason: String,
    headers: HeaderMap,
}

impl Response {
    pub fn new(version: Version, status: StatusCode, reason: impl Into<String>) -> Self {
        Self { version, status, reason: reason.into(), headers: HeaderMap::new() }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub(crate) fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}
