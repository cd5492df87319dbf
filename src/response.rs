//! http response
use bytes::Bytes;

use crate::headers::Headers;

pub(crate) mod parser;


/// a fully received http response
///
/// only constructed once the status line, the header section and the
/// whole framed body are off the wire, a partial response is never
/// observable
pub struct Response {
    status: u16,
    headers: Headers,
    body: Bytes,
}

impl Response {
    pub(crate) fn new(status: u16, headers: Headers, body: Bytes) -> Response {
        Response { status, headers, body }
    }

    /// status code from the status line
    pub fn status(&self) -> u16 {
        self.status
    }

    /// response headers in wire order
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// raw body bytes, no decompression or charset decoding applied
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// consume the response into its body
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body.len())
            .finish()
    }
}
