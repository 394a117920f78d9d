use std::fmt::{Display, Formatter};

use crate::codec::DecodeError;

/// The two HTTP versions this engine speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http10,
    Http11,
}

impl Version {
    /// Parse a start-line version token.
    ///
    /// The `HTTP/` prefix is matched case-insensitively; the digits must be
    /// exactly `1.0` or `1.1`.
    pub fn from_token(token: &str) -> Result<Self, DecodeError> {
        let unknown = || DecodeError::UnknownVersion { token: token.to_owned() };

        let (prefix, digits) = token.split_at_checked(5).ok_or_else(unknown)?;
        if !prefix.eq_ignore_ascii_case("HTTP/") {
            return Err(unknown());
        }

        match digits {
            "1.0" => Ok(Version::Http10),
            "1.1" => Ok(Version::Http11),
            _ => Err(unknown()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_versions() {
        assert_eq!(Version::from_token("HTTP/1.1").unwrap(), Version::Http11);
        assert_eq!(Version::from_token("HTTP/1.0").unwrap(), Version::Http10);
        assert_eq!(Version::from_token("http/1.1").unwrap(), Version::Http11);
    }

    #[test]
    fn unknown_versions() {
        for token in ["HTTP/2.0", "HTTP/1.2", "HTTP/1", "SPDY/3", "HTTP1.1", ""] {
            assert!(
                matches!(Version::from_token(token), Err(DecodeError::UnknownVersion { .. })),
                "token {token:?} should not parse"
            );
        }
    }
}
