use std::mem;
use std::time::Duration;

use bytes::BytesMut;
use http::header::{HeaderValue, CONNECTION, CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderMap, StatusCode};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{error, trace, warn};

use crate::codec::{
    load_headers, parse_request_line, parse_status_line, read_line, PayloadDecoder, PayloadItem,
    RequestEncoder, ResponseEncoder,
};
use crate::connection::ConnHandler;
use crate::protocol::{ConnError, Method, Request, Response, Version};
use crate::transport::{Duplex, TransportEvent};

/// Outbound backlog above which `write_buf` asks the embedder to stop.
pub const MAX_WRITE_BACKLOG: usize = 50 * 1024;

/// How long the driver lets a client-facing connection wait for a message.
pub const IDLE_CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

/// How long the driver lets a server-facing connection wait for a message.
pub const IDLE_SERVER_TIMEOUT: Duration = Duration::from_secs(120);

/// The direction this connection faces, which decides the start line it
/// parses and the one it emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The peer is an HTTP client: we read requests and write responses.
    Client,
    /// The peer is an HTTP server: we read responses and write requests.
    Server,
}

/// Where the connection stands in its message lifecycle. `Mangled` is
/// terminal: the connection is dead but not yet dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Idle,
    ReadFirstline,
    ReadHeaders,
    ReadBody,
    Mangled,
}

/// What `write_buf` said about the outbound buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum WriteOutcome {
    Accepted,
    /// The backlog threshold was crossed; stop producing until
    /// `on_write_more`.
    Choked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransferCoding {
    Identity,
    Chunked,
}

/// A single HTTP/1.x connection: an event-driven state machine that parses
/// inbound messages incrementally and lets the embedder emit outbound ones on
/// the same stream.
///
/// The engine never touches a socket. The driver owns the event loop and
/// enters the machine through the transport edges ([`on_readable`],
/// [`on_writable`], [`on_event`]); the embedder reacts through its
/// [`ConnHandler`] and steers with the verb methods. Entry points that can
/// fire callbacks take the handler by `&mut`, so the engine cannot be
/// re-entered from inside a callback.
///
/// [`on_readable`]: HttpConnection::on_readable
/// [`on_writable`]: HttpConnection::on_writable
/// [`on_event`]: HttpConnection::on_event
pub struct HttpConnection {
    role: Role,
    phase: Phase,
    version: Option<Version>,
    te: TransferCoding,
    has_body: bool,
    choked: bool,
    read_paused: bool,
    msg_complete_on_eof: bool,
    persistent: bool,
    firstline: Option<String>,
    headers: HeaderMap,
    payload_decoder: Option<PayloadDecoder>,
    transport: Duplex,
    scratch: BytesMut,
}

impl HttpConnection {
    /// A connection over an already-established transport (an accepted
    /// socket). The first message begins immediately.
    pub fn new(role: Role) -> Self {
        let mut conn = Self::with_phase(role, Phase::Connecting);
        conn.begin_message();
        conn
    }

    /// An outbound connection whose transport is still being dialed by the
    /// driver. It waits in the connecting phase until the driver reports
    /// [`TransportEvent::Connected`] or [`TransportEvent::ConnectFailed`].
    pub fn connecting(role: Role) -> Self {
        Self::with_phase(role, Phase::Connecting)
    }

    fn with_phase(role: Role, phase: Phase) -> Self {
        Self {
            role,
            phase,
            version: None,
            te: TransferCoding::Identity,
            has_body: false,
            choked: false,
            read_paused: false,
            msg_complete_on_eof: false,
            persistent: false,
            firstline: None,
            headers: HeaderMap::new(),
            payload_decoder: None,
            transport: Duplex::new(),
            scratch: BytesMut::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The version negotiated by the messages seen so far.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// The buffered transport, for the driver pumping the socket.
    pub fn transport(&self) -> &Duplex {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Duplex {
        &mut self.transport
    }

    /// The idle timeout the driver should arm while the phase is idle,
    /// reporting expiry as [`TransportEvent::ReadTimeout`].
    pub fn idle_timeout(&self) -> Duration {
        match self.role {
            Role::Client => IDLE_CLIENT_TIMEOUT,
            Role::Server => IDLE_SERVER_TIMEOUT,
        }
    }

    // ------------------------------------------------------------------
    // Transport edges
    // ------------------------------------------------------------------

    /// Bytes arrived in the transport's input buffer. Consumes as many
    /// messages as the buffered bytes allow, stopping when the buffer runs
    /// dry, the current phase cannot progress, or the embedder paused
    /// reading.
    pub fn on_readable<H: ConnHandler>(&mut self, handler: &mut H) {
        if matches!(self.phase, Phase::Connecting | Phase::Mangled) || self.read_paused {
            return;
        }
        self.process_input(handler);
    }

    /// The output buffer drained to its low-watermark.
    pub fn on_writable<H: ConnHandler>(&mut self, handler: &mut H) {
        if self.phase == Phase::Mangled {
            return;
        }

        if self.choked {
            self.transport.set_write_low_watermark(0);
            self.choked = false;
            handler.on_write_more(self);
        } else if self.transport.output_is_empty() {
            handler.on_flush(self);
        }
    }

    /// Connect resolution, EOF, errors and timeouts, demultiplexed by the
    /// current phase.
    pub fn on_event<H: ConnHandler>(&mut self, handler: &mut H, event: TransportEvent) {
        if self.phase == Phase::Mangled {
            return;
        }

        if self.phase == Phase::Connecting {
            if event == TransportEvent::Connected {
                self.begin_message();
                handler.on_connect(self);
            } else {
                self.phase = Phase::Mangled;
                self.persistent = false;
                self.transport.disable_read();
                self.transport.disable_write();
                handler.on_error(self, ConnError::ConnectFailed);
            }
            return;
        }

        debug_assert!(event != TransportEvent::Connected);

        if event == TransportEvent::WriteError {
            return self.end_message(handler, Err(ConnError::WriteFailed));
        }

        match self.phase {
            Phase::Idle => self.end_message(handler, Err(ConnError::IdleConnTimedOut)),
            Phase::ReadFirstline | Phase::ReadHeaders => {
                self.end_message(handler, Err(ConnError::IncompleteHeaders))
            }
            Phase::ReadBody => {
                if event == TransportEvent::ReadEof && self.msg_complete_on_eof {
                    if !self.transport.input_is_empty() {
                        let bytes = self.transport.input_mut().split();
                        self.deliver_body(handler, &bytes);
                    }
                    self.end_message(handler, Ok(()))
                } else {
                    self.end_message(handler, Err(ConnError::IncompleteBody))
                }
            }
            Phase::Connecting | Phase::Mangled => {
                unreachable!("event demultiplexed in invalid phase")
            }
        }
    }

    // ------------------------------------------------------------------
    // Embedder verbs
    // ------------------------------------------------------------------

    /// Emit a request head. Server-facing connections only: we are the
    /// client of the upstream.
    pub fn write_request(&mut self, req: &Request) {
        debug_assert_eq!(self.role, Role::Server);

        if let Err(e) = RequestEncoder.encode(req, self.transport.output_mut()) {
            error!(cause = %e, "failed to encode request head");
        }
    }

    /// Emit a response head on a client-facing connection. The status line
    /// carries the negotiated version, falling back to the response's own.
    pub fn write_response(&mut self, resp: &Response) {
        debug_assert_eq!(self.role, Role::Client);

        let version = self.version.unwrap_or(resp.version());
        if let Err(e) = ResponseEncoder.encode((resp, version), self.transport.output_mut()) {
            error!(cause = %e, "failed to encode response head");
        }
    }

    /// Append body bytes to the outbound buffer, verbatim. If the outbound
    /// message negotiated chunked transfer, the embedder frames the bytes
    /// itself before handing them over.
    ///
    /// Returns [`WriteOutcome::Choked`] once the buffered length exceeds
    /// [`MAX_WRITE_BACKLOG`]; the embedder then stops producing until
    /// `on_write_more`.
    pub fn write_buf(&mut self, data: &[u8]) -> WriteOutcome {
        self.transport.output_mut().extend_from_slice(data);

        if self.transport.output_len() > MAX_WRITE_BACKLOG {
            self.transport.set_write_low_watermark(MAX_WRITE_BACKLOG / 2);
            self.choked = true;
            return WriteOutcome::Choked;
        }

        WriteOutcome::Accepted
    }

    pub fn current_message_has_body(&self) -> bool {
        self.has_body
    }

    /// Force the current message bodyless: a client-facing connection
    /// composing a response that must not carry a body, or a server-facing
    /// connection that knows the response it is reading answers a HEAD
    /// (call it from `on_server_response`, before body streaming starts).
    pub fn set_current_message_bodyless(&mut self) {
        self.has_body = false;
        self.payload_decoder = None;
    }

    /// Whether the connection may be reused for another message once the
    /// current one completes.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Disable the read side; buffered input stays put until
    /// [`start_reading`](HttpConnection::start_reading).
    pub fn stop_reading(&mut self) {
        self.transport.disable_read();
        self.read_paused = true;
    }

    /// Re-enable the read side and resume the state machine over anything
    /// already buffered. Driver context only: the handler borrow keeps this
    /// out of reach of the engine's own callbacks.
    pub fn start_reading<H: ConnHandler>(&mut self, handler: &mut H) {
        if self.phase == Phase::Mangled {
            return;
        }

        self.transport.enable_read();
        self.read_paused = false;

        if !self.transport.input_is_empty() && self.phase != Phase::Connecting {
            self.process_input(handler);
        }
    }

    /// Deliver `on_flush` right away if the outbound buffer is already
    /// empty.
    pub fn flush<H: ConnHandler>(&mut self, handler: &mut H) {
        if self.phase == Phase::Mangled {
            return;
        }

        if self.transport.output_is_empty() {
            handler.on_flush(self);
        }
    }

    /// Queue a minimal error response: the negotiated (or 1.1) version, the
    /// canonical reason phrase, no body, and a Connection header that closes
    /// unless the connection can still be reused.
    pub fn send_error(&mut self, status: StatusCode) {
        let keep_alive = self.phase != Phase::ReadBody && self.persistent;
        let version = self.version.unwrap_or(Version::Http11);

        let mut resp =
            Response::new(version, status, status.canonical_reason().unwrap_or("Unknown"));
        resp.headers_mut().insert(
            CONNECTION,
            HeaderValue::from_static(if keep_alive { "keep-alive" } else { "close" }),
        );
        resp.headers_mut().insert(CONTENT_LENGTH, HeaderValue::from_static("0"));

        if let Err(e) = ResponseEncoder.encode((&resp, version), self.transport.output_mut()) {
            error!(cause = %e, "failed to encode error response");
        }
    }

    // ------------------------------------------------------------------
    // Message lifecycle
    // ------------------------------------------------------------------

    fn begin_message(&mut self) {
        debug_assert!(self.firstline.is_none() && self.headers.is_empty());
        debug_assert!(!self.read_paused);

        self.phase = Phase::Idle;
        self.transport.enable_read();
        self.transport.enable_write();
    }

    fn end_message<H: ConnHandler>(&mut self, handler: &mut H, result: Result<(), ConnError>) {
        self.firstline = None;
        self.headers.clear();
        self.payload_decoder = None;

        if result.is_err() || !self.persistent {
            self.phase = Phase::Mangled;
            self.persistent = false;
            self.transport.disable_read();
            self.transport.disable_write();
        } else {
            self.begin_message();
        }

        match result {
            Ok(()) => handler.on_msg_complete(self),
            Err(err) => handler.on_error(self, err),
        }
    }

    // ------------------------------------------------------------------
    // Read path
    // ------------------------------------------------------------------

    fn process_input<H: ConnHandler>(&mut self, handler: &mut H) {
        loop {
            let before = (self.phase, self.transport.input_len());
            self.process_one_message(handler);

            if self.read_paused
                || matches!(self.phase, Phase::Mangled | Phase::Connecting)
                || self.transport.input_is_empty()
            {
                break;
            }
            // a pass that neither consumed bytes nor changed phase is stuck
            // on a partial line or header block
            if (self.phase, self.transport.input_len()) == before {
                break;
            }
        }
    }

    fn process_one_message<H: ConnHandler>(&mut self, handler: &mut H) {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::ReadFirstline;
                self.read_firstline(handler);
            }
            Phase::ReadFirstline => self.read_firstline(handler),
            Phase::ReadHeaders => self.read_headers(handler),
            Phase::ReadBody => self.read_body(handler),
            Phase::Connecting | Phase::Mangled => {
                error!(phase = ?self.phase, "readable edge in invalid phase");
            }
        }
    }

    fn read_firstline<H: ConnHandler>(&mut self, handler: &mut H) {
        debug_assert!(self.firstline.is_none());

        let Some(line) = read_line(self.transport.input_mut()) else { return };
        match String::from_utf8(line.to_vec()) {
            Ok(line) => {
                trace!(line = %line, "read start line");
                self.firstline = Some(line);
                self.phase = Phase::ReadHeaders;
            }
            Err(_) => {
                warn!("start line is not valid utf-8");
                self.end_message(handler, Err(ConnError::HeaderParseFailed));
            }
        }
    }

    fn read_headers<H: ConnHandler>(&mut self, handler: &mut H) {
        debug_assert_eq!(self.phase, Phase::ReadHeaders);

        match load_headers(&mut self.headers, self.transport.input_mut()) {
            Err(e) => {
                warn!(cause = %e, "header block rejected");
                return self.end_message(handler, Err(ConnError::HeaderParseFailed));
            }
            Ok(false) => return,
            Ok(true) => {}
        }

        let Some(firstline) = self.firstline.take() else {
            unreachable!("header block completed without a start line");
        };

        match self.role {
            Role::Client => {
                let (method, uri, version) = match parse_request_line(&firstline) {
                    Ok(parts) => parts,
                    Err(e) => {
                        warn!(cause = %e, "bad request line");
                        return self.end_message(handler, Err(ConnError::HeaderParseFailed));
                    }
                };

                let role_has_body = matches!(method, Method::Post | Method::Put);
                if let Err(err) = self.inspect_framing(version, role_has_body) {
                    return self.end_message(handler, Err(err));
                }

                let req =
                    Request::new(method, uri, version).with_headers(mem::take(&mut self.headers));
                handler.on_client_request(self, req);
            }
            Role::Server => {
                let (version, status, reason) = match parse_status_line(&firstline) {
                    Ok(parts) => parts,
                    Err(e) => {
                        warn!(cause = %e, "bad status line");
                        return self.end_message(handler, Err(ConnError::HeaderParseFailed));
                    }
                };

                let role_has_body = !(status.is_informational()
                    || status == StatusCode::NO_CONTENT
                    || status == StatusCode::RESET_CONTENT
                    || status == StatusCode::NOT_MODIFIED);
                if let Err(err) = self.inspect_framing(version, role_has_body) {
                    return self.end_message(handler, Err(err));
                }

                let resp = Response::new(version, status, reason)
                    .with_headers(mem::take(&mut self.headers));
                handler.on_server_response(self, resp);
            }
        }

        if self.has_body {
            self.phase = Phase::ReadBody;
        } else {
            self.end_message(handler, Ok(()));
        }
    }

    /// Decide the body framing and the persistence of the message whose
    /// headers just completed, while the staging header list is still ours.
    fn inspect_framing(&mut self, version: Version, role_has_body: bool) -> Result<(), ConnError> {
        self.te = TransferCoding::Identity;
        self.msg_complete_on_eof = false;
        self.has_body = role_has_body;
        let mut remaining = None;

        if self.has_body {
            if let Some(value) = self.headers.get(TRANSFER_ENCODING) {
                match value.to_str() {
                    Ok(te) if te.trim().eq_ignore_ascii_case("chunked") => {
                        self.te = TransferCoding::Chunked;
                    }
                    _ => warn!(value = ?value, "ignoring unsupported transfer-encoding"),
                }
            }

            if self.te != TransferCoding::Chunked {
                if let Some(value) = self.headers.get(CONTENT_LENGTH) {
                    let parsed =
                        value.to_str().ok().and_then(|v| v.trim().parse::<u64>().ok());
                    let Some(length) = parsed else {
                        warn!(value = ?value, "mangled content-length");
                        return Err(ConnError::HeaderParseFailed);
                    };
                    remaining = Some(length);
                    if length == 0 {
                        self.has_body = false;
                    }
                } else {
                    self.msg_complete_on_eof = true;
                }
            }

            if self.role == Role::Client
                && remaining.is_none()
                && self.te != TransferCoding::Chunked
            {
                return Err(ConnError::ClientPostWithoutLength);
            }
        }

        let mut persistent = !self.msg_complete_on_eof && version == Version::Http11;

        if let Some(previous) = self.version {
            if previous != version {
                warn!(%previous, current = %version, "http version changed mid-connection");
                persistent = false;
            }
        }
        self.version = Some(version);

        if persistent {
            if let Some(value) = self.headers.get(CONNECTION) {
                if value.to_str().is_ok_and(|v| v.trim().eq_ignore_ascii_case("close")) {
                    persistent = false;
                }
            }
        }
        self.persistent = persistent;

        self.payload_decoder = if !self.has_body {
            None
        } else if self.te == TransferCoding::Chunked {
            Some(PayloadDecoder::chunked())
        } else if let Some(length) = remaining {
            Some(PayloadDecoder::length(length))
        } else {
            Some(PayloadDecoder::until_eof())
        };

        Ok(())
    }

    fn read_body<H: ConnHandler>(&mut self, handler: &mut H) {
        debug_assert!(self.has_body);

        loop {
            let Some(decoder) = self.payload_decoder.as_mut() else {
                unreachable!("read body without a payload decoder");
            };

            match decoder.decode(self.transport.input_mut()) {
                Ok(Some(PayloadItem::Chunk(bytes))) => {
                    self.deliver_body(handler, &bytes);
                    if self.read_paused {
                        return;
                    }
                }
                Ok(Some(PayloadItem::Eof)) => return self.end_message(handler, Ok(())),
                Ok(None) => return,
                Err(e) => {
                    warn!(cause = %e, "chunked body rejected");
                    return self.end_message(handler, Err(ConnError::ChunkParseFailed));
                }
            }
        }
    }

    /// Stage body bytes in the scratch buffer and hand that buffer to the
    /// embedder, so the transport's input buffer is never aliased across the
    /// callback.
    fn deliver_body<H: ConnHandler>(&mut self, handler: &mut H, bytes: &[u8]) {
        self.scratch.extend_from_slice(bytes);

        let mut scratch = mem::take(&mut self.scratch);
        handler.on_read_body(self, &mut scratch);
        self.scratch = scratch;
    }
}
