use http::{HeaderMap, Uri};

use crate::protocol::{Method, Version};

/// A parsed request head, handed to the embedder by `on_client_request`.
///
/// Ownership of the header list moves with it; the connection installs a
/// fresh list before reading the next message.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
}

impl Request {
    pub fn new(method: Method, uri: Uri, version: Version) -> Self {
        Self { method, uri, version, headers: HeaderMap::new() }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn version(&self) -> Version {
        self.version
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
