use bytes::{Buf, BytesMut};
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use httparse::Status;
use snafu::{ensure, ResultExt};
use tracing::trace;

use crate::codec::error::{
    DecodeError, InvalidHeaderNameSnafu, InvalidHeaderValueSnafu, TooLargeHeaderSnafu,
};

const MAX_HEADER_NUM: usize = 64;
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Load a CRLF-terminated header block from `src` into `dst`.
///
/// Returns `Ok(true)` once the whole block, including its terminating blank
/// line, has been consumed; `Ok(false)` when more bytes are needed. Repeated
/// header names are appended so multi-value headers survive intact.
pub fn load_headers(dst: &mut HeaderMap, src: &mut BytesMut) -> Result<bool, DecodeError> {
    let mut parsed = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];

    let status = httparse::parse_headers(src.as_ref(), &mut parsed).map_err(|e| match e {
        httparse::Error::TooManyHeaders => {
            DecodeError::TooManyHeaders { limit: MAX_HEADER_NUM, source: e }
        }
        _ => DecodeError::InvalidHeader { source: e },
    })?;

    match status {
        Status::Complete((consumed, headers)) => {
            trace!(header_bytes = consumed, header_num = headers.len(), "parsed header block");
            ensure!(
                consumed <= MAX_HEADER_BYTES,
                TooLargeHeaderSnafu { size: consumed, limit: MAX_HEADER_BYTES }
            );

            for header in headers {
                let name =
                    HeaderName::from_bytes(header.name.as_bytes()).context(InvalidHeaderNameSnafu)?;
                let value = HeaderValue::from_bytes(header.value).context(InvalidHeaderValueSnafu)?;
                dst.append(name, value);
            }

            src.advance(consumed);
            Ok(true)
        }
        Status::Partial => {
            ensure!(
                src.len() <= MAX_HEADER_BYTES,
                TooLargeHeaderSnafu { size: src.len(), limit: MAX_HEADER_BYTES }
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_block() {
        let mut headers = HeaderMap::new();
        let mut buf = BytesMut::from(&b"Host: a\r\nAccept: */*\r\n\r\nrest"[..]);

        assert!(load_headers(&mut headers, &mut buf).unwrap());
        assert_eq!(&buf[..], b"rest");
        assert_eq!(headers.get(http::header::HOST).unwrap(), "a");
        assert_eq!(headers.get(http::header::ACCEPT).unwrap(), "*/*");
    }

    #[test]
    fn empty_block() {
        let mut headers = HeaderMap::new();
        let mut buf = BytesMut::from(&b"\r\nbody"[..]);

        assert!(load_headers(&mut headers, &mut buf).unwrap());
        assert!(headers.is_empty());
        assert_eq!(&buf[..], b"body");
    }

    #[test]
    fn partial_block() {
        let mut headers = HeaderMap::new();
        let mut buf = BytesMut::from(&b"Host: a\r\nAccep"[..]);

        assert!(!load_headers(&mut headers, &mut buf).unwrap());
        // nothing consumed until the block completes
        assert_eq!(buf.len(), 14);

        buf.extend_from_slice(b"t: */*\r\n\r\n");
        assert!(load_headers(&mut headers, &mut buf).unwrap());
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn multi_value_preserved() {
        let mut headers = HeaderMap::new();
        let mut buf = BytesMut::from(&b"Set-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n"[..]);

        assert!(load_headers(&mut headers, &mut buf).unwrap());
        let values: Vec<_> = headers.get_all(http::header::SET_COOKIE).iter().collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "a=1");
        assert_eq!(values[1], "b=2");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        let mut buf = BytesMut::from(&b"CONTENT-length: 12\r\n\r\n"[..]);

        assert!(load_headers(&mut headers, &mut buf).unwrap());
        assert_eq!(headers.get("content-length").unwrap(), "12");
    }

    #[test]
    fn malformed_line_rejected() {
        let mut headers = HeaderMap::new();
        let mut buf = BytesMut::from(&b"not a header line\r\n\r\n"[..]);

        assert!(load_headers(&mut headers, &mut buf).is_err());
    }

    #[test]
    fn oversized_block_rejected() {
        let mut headers = HeaderMap::new();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(b"X-Filler: ");
        buf.extend_from_slice(&vec![b'a'; MAX_HEADER_BYTES]);

        assert!(matches!(
            load_headers(&mut headers, &mut buf),
            Err(DecodeError::TooLargeHeader { .. })
        ));
    }
}
