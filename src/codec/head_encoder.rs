use std::io;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::codec::dump_headers;
use crate::protocol::{Request, Response, Version};

/// Emit `METHOD request-target VERSION` plus the header block.
///
/// The request-target is the URI's path and query; `/` when the URI has none.
pub struct RequestEncoder;

impl<'a> Encoder<&'a Request> for RequestEncoder {
    type Error = io::Error;

    fn encode(&mut self, req: &'a Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .filter(|target| !target.is_empty())
            .unwrap_or("/");

        dst.put_slice(req.method().as_str().as_bytes());
        dst.put_slice(b" ");
        dst.put_slice(target.as_bytes());
        dst.put_slice(b" ");
        dst.put_slice(req.version().as_str().as_bytes());
        dst.put_slice(b"\r\n");

        dump_headers(req.headers(), dst);
        Ok(())
    }
}

/// Emit `VERSION code reason` plus the header block.
///
/// The version comes with the item rather than from the response head: the
/// connection echoes its negotiated version on outgoing status lines.
pub struct ResponseEncoder;

impl<'a> Encoder<(&'a Response, Version)> for ResponseEncoder {
    type Error = io::Error;

    fn encode(&mut self, item: (&'a Response, Version), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (resp, version) = item;

        dst.put_slice(version.as_str().as_bytes());
        dst.put_slice(b" ");
        dst.put_slice(resp.status().as_str().as_bytes());
        dst.put_slice(b" ");
        dst.put_slice(resp.reason().as_bytes());
        dst.put_slice(b"\r\n");

        dump_headers(resp.headers(), dst);
        Ok(())
    }
}
