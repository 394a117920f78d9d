use snafu::prelude::*;

use std::io::Error as IoError;

/// Failures raised while decoding wire bytes. The connection layer logs
/// these and folds them into its own error taxonomy; the embedder never
/// sees them directly.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DecodeError {
    #[snafu(display("io failure while decoding: {source}"), context(false))]
    Io { source: IoError },

    #[snafu(display("header block of {size} bytes is over the {limit} byte cap"))]
    TooLargeHeader { size: usize, limit: usize },

    #[snafu(display("more than {limit} header lines: {source}"))]
    TooManyHeaders { limit: usize, source: httparse::Error },

    #[snafu(display("header line rejected: {source}"))]
    InvalidHeader { source: httparse::Error },

    #[snafu(display("header name not usable: {source}"))]
    InvalidHeaderName { source: http::header::InvalidHeaderName },

    #[snafu(display("header value not usable: {source}"))]
    InvalidHeaderValue { source: http::header::InvalidHeaderValue },

    #[snafu(display("malformed start line: {line:?}"))]
    InvalidStartLine { line: String },

    #[snafu(display("unknown method: {token:?}"))]
    UnknownMethod { token: String },

    #[snafu(display("unknown http version: {token:?}"))]
    UnknownVersion { token: String },

    #[snafu(display("invalid status code: {token:?}"))]
    InvalidStatus { token: String },

    #[snafu(display("invalid request target: {source}"))]
    InvalidUri { source: http::uri::InvalidUri },

    #[snafu(display("invalid chunk size line: {line:?}"))]
    InvalidChunkSize { line: String },
}
