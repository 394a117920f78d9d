use snafu::Snafu;

/// Why a connection died.
///
/// Every kind is terminal: the connection enters the mangled phase, both
/// transport directions are disabled, and a single `on_error` is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum ConnError {
    /// The outbound transport never established.
    #[snafu(display("outbound connection failed"))]
    ConnectFailed,

    /// EOF or timeout while waiting for a new message on a kept-alive
    /// connection.
    #[snafu(display("idle connection timed out"))]
    IdleConnTimedOut,

    /// EOF mid start-line or mid-headers.
    #[snafu(display("eof before message headers completed"))]
    IncompleteHeaders,

    /// Malformed start line, unknown method or version, bad URL, or a header
    /// line the parser rejected.
    #[snafu(display("malformed start line or headers"))]
    HeaderParseFailed,

    /// An inbound request declared a body but carried neither Content-Length
    /// nor chunked framing.
    #[snafu(display("request body without content-length or chunked framing"))]
    ClientPostWithoutLength,

    /// A chunk-size line that did not parse as hex.
    #[snafu(display("unreadable chunk length"))]
    ChunkParseFailed,

    /// EOF before a fixed-length or chunked body completed.
    #[snafu(display("eof before message body completed"))]
    IncompleteBody,

    /// Any write-side transport failure.
    #[snafu(display("write side of the transport failed"))]
    WriteFailed,
}
