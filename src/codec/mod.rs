mod body;
mod error;
mod firstline;
mod head_encoder;
mod header;

pub use body::{PayloadDecoder, PayloadItem};
pub use error::DecodeError;
pub use firstline::{parse_request_line, parse_status_line};
pub use head_encoder::{RequestEncoder, ResponseEncoder};
pub use header::{dump_headers, load_headers};

use bytes::{Buf, BytesMut};

/// Pull one CRLF-terminated line off the front of `src`, not including the
/// terminator. Returns `None` when no full line is buffered yet.
pub(crate) fn read_line(src: &mut BytesMut) -> Option<BytesMut> {
    let pos = src.windows(2).position(|w| w == b"\r\n")?;
    let line = src.split_to(pos);
    src.advance(2);
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_line_splits_on_crlf() {
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: a\r\n"[..]);
        assert_eq!(read_line(&mut buf).unwrap().as_ref(), b"GET / HTTP/1.1");
        assert_eq!(read_line(&mut buf).unwrap().as_ref(), b"Host: a");
        assert!(read_line(&mut buf).is_none());
    }

    #[test]
    fn read_line_waits_for_terminator() {
        let mut buf = BytesMut::from(&b"HTTP/1.1 200"[..]);
        assert!(read_line(&mut buf).is_none());
        assert_eq!(buf.len(), 12);

        buf.extend_from_slice(b" OK\r\n");
        assert_eq!(read_line(&mut buf).unwrap().as_ref(), b"HTTP/1.1 200 OK");
    }

    #[test]
    fn read_line_yields_empty_lines() {
        let mut buf = BytesMut::from(&b"\r\nnext"[..]);
        assert_eq!(read_line(&mut buf).unwrap().len(), 0);
        assert_eq!(&buf[..], b"next");
    }
}
