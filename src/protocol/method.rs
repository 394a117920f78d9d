use std::fmt::{Display, Formatter};

use crate::codec::DecodeError;

/// Request methods the engine understands.
///
/// The set is closed on purpose: an intercepting proxy only ever forwards
/// these, and anything else on the wire is a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Connect,
}

impl Method {
    /// Match a request-line token, case-insensitively.
    pub fn from_token(token: &str) -> Result<Self, DecodeError> {
        if token.eq_ignore_ascii_case("GET") {
            Ok(Method::Get)
        } else if token.eq_ignore_ascii_case("HEAD") {
            Ok(Method::Head)
        } else if token.eq_ignore_ascii_case("POST") {
            Ok(Method::Post)
        } else if token.eq_ignore_ascii_case("PUT") {
            Ok(Method::Put)
        } else if token.eq_ignore_ascii_case("CONNECT") {
            Ok(Method::Connect)
        } else {
            Err(DecodeError::UnknownMethod { token: token.to_owned() })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Connect => "CONNECT",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tokens() {
        assert_eq!(Method::from_token("GET").unwrap(), Method::Get);
        assert_eq!(Method::from_token("post").unwrap(), Method::Post);
        assert_eq!(Method::from_token("Connect").unwrap(), Method::Connect);
    }

    #[test]
    fn unknown_token() {
        assert!(matches!(
            Method::from_token("BREW"),
            Err(DecodeError::UnknownMethod { .. })
        ));
        assert!(matches!(Method::from_token(""), Err(DecodeError::UnknownMethod { .. })));
    }
}
