use bytes::{BufMut, BytesMut};
use http::HeaderMap;

/// Serialize a header list as `name: value` lines plus the blank terminator.
pub fn dump_headers(headers: &HeaderMap, dst: &mut BytesMut) {
    for (name, value) in headers {
        dst.put_slice(name.as_str().as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
        dst.put_slice(b"\r\n");
    }
    dst.put_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, SET_COOKIE};

    #[test]
    fn dumps_in_order_with_terminator() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::HOST, HeaderValue::from_static("a"));
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let mut buf = BytesMut::new();
        dump_headers(&headers, &mut buf);

        assert_eq!(&buf[..], b"host: a\r\nset-cookie: a=1\r\nset-cookie: b=2\r\n\r\n");
    }

    #[test]
    fn empty_list_is_just_the_blank_line() {
        let mut buf = BytesMut::new();
        dump_headers(&HeaderMap::new(), &mut buf);
        assert_eq!(&buf[..], b"\r\n");
    }
}
