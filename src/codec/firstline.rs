use http::{StatusCode, Uri};
use snafu::ResultExt;

use crate::codec::error::{DecodeError, InvalidStartLineSnafu, InvalidUriSnafu};
use crate::protocol::{Method, Version};

/// Parse a request line: exactly three space-separated tokens.
///
/// The request-target goes through the `http::Uri` parser; a double space
/// produces an extra (empty) token and fails like any other malformed line.
pub fn parse_request_line(line: &str) -> Result<(Method, Uri, Version), DecodeError> {
    let mut tokens = line.split(' ');
    let (Some(method), Some(target), Some(version), None) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        return InvalidStartLineSnafu { line }.fail();
    };

    let method = Method::from_token(method)?;
    let uri = target.parse::<Uri>().context(InvalidUriSnafu)?;
    let version = Version::from_token(version)?;

    Ok((method, uri, version))
}

/// Parse a status line. Only the first two spaces split; the reason phrase
/// keeps any embedded spaces and is returned verbatim.
pub fn parse_status_line(line: &str) -> Result<(Version, StatusCode, String), DecodeError> {
    let mut tokens = line.splitn(3, ' ');
    let (Some(version), Some(code), Some(reason)) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return InvalidStartLineSnafu { line }.fail();
    };

    let version = Version::from_token(version)?;
    let status = code
        .parse::<u16>()
        .ok()
        .and_then(|c| StatusCode::from_u16(c).ok())
        .ok_or_else(|| DecodeError::InvalidStatus { token: code.to_owned() })?;

    Ok((version, status, reason.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line() {
        let (method, uri, version) = parse_request_line("GET /index.html HTTP/1.1").unwrap();
        assert_eq!(method, Method::Get);
        assert_eq!(uri.path(), "/index.html");
        assert_eq!(version, Version::Http11);
    }

    #[test]
    fn request_line_token_count() {
        assert!(parse_request_line("GET /index.html").is_err());
        assert!(parse_request_line("GET /a HTTP/1.1 extra").is_err());
        assert!(parse_request_line("GET  /a HTTP/1.1").is_err());
        assert!(parse_request_line("").is_err());
    }

    #[test]
    fn request_line_bad_tokens() {
        assert!(matches!(
            parse_request_line("BREW /pot HTTP/1.1"),
            Err(DecodeError::UnknownMethod { .. })
        ));
        assert!(matches!(
            parse_request_line("GET /pot HTTP/3.0"),
            Err(DecodeError::UnknownVersion { .. })
        ));
    }

    #[test]
    fn status_line() {
        let (version, status, reason) = parse_status_line("HTTP/1.1 200 OK").unwrap();
        assert_eq!(version, Version::Http11);
        assert_eq!(status.as_u16(), 200);
        assert_eq!(reason, "OK");
    }

    #[test]
    fn status_line_reason_keeps_spaces() {
        let (_, status, reason) = parse_status_line("HTTP/1.0 404 Not Found").unwrap();
        assert_eq!(status.as_u16(), 404);
        assert_eq!(reason, "Not Found");
    }

    #[test]
    fn status_line_requires_reason_token() {
        assert!(parse_status_line("HTTP/1.1 200").is_err());

        // an empty reason is still a token
        let (_, _, reason) = parse_status_line("HTTP/1.1 200 ").unwrap();
        assert_eq!(reason, "");
    }

    #[test]
    fn status_line_code_range() {
        assert!(parse_status_line("HTTP/1.1 99 Low").is_err());
        assert!(parse_status_line("HTTP/1.1 1000 High").is_err());
        assert!(parse_status_line("HTTP/1.1 abc Bad").is_err());
        assert!(parse_status_line("HTTP/1.1 999 Edge").is_ok());
    }
}
