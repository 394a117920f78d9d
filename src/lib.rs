//! Single-connection HTTP/1.x protocol engine for an intercepting proxy.
//!
//! An [`HttpConnection`] is an event-driven state machine over a buffered
//! byte stream: it parses requests or responses incrementally (start line,
//! headers, body), streams body bytes without buffering messages whole, and
//! lets the embedder emit outbound messages on the same stream. One engine
//! speaks one side of the proxy; a forwarding pair wires a client-facing and
//! a server-facing connection together through their [`ConnHandler`]s.
//!
//! The engine owns no socket. A driver pumps bytes between the socket and
//! the connection's [`transport::Duplex`] and reports edges (readable,
//! writable, EOF, errors, connect resolution). Framing, keep-alive, flow
//! control in both directions, and the error taxonomy all live here.

pub mod codec;
pub mod connection;
pub mod protocol;
pub mod transport;

pub use connection::{
    ConnHandler, HttpConnection, Phase, Role, WriteOutcome, IDLE_CLIENT_TIMEOUT,
    IDLE_SERVER_TIMEOUT, MAX_WRITE_BACKLOG,
};
pub use protocol::{ConnError, Method, Request, Response, Version};
pub use transport::{Duplex, TransportEvent};
