use bytes::{Bytes, BytesMut};

/// Edges the driver reports through `HttpConnection::on_event`.
///
/// `Connected`/`ConnectFailed` resolve an outbound connect; the rest describe
/// how an established transport failed. Read-side timeouts (idle or mid-read)
/// arrive as `ReadTimeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    Connected,
    ConnectFailed,
    ReadEof,
    ReadError,
    ReadTimeout,
    WriteError,
}

/// The buffered, bidirectional face of the socket.
///
/// The driver owns the socket and the event loop; this struct is where the
/// two meet. Incoming bytes land in the input buffer via [`push_input`]
/// (only while [`read_enabled`]), after which the driver calls
/// `on_readable`. Outgoing bytes accumulate in the output buffer until the
/// driver moves them to the socket with [`take_output`]; once the buffered
/// length has drained to the write low-watermark the driver calls
/// `on_writable` ([`needs_writable_edge`]).
///
/// [`push_input`]: Duplex::push_input
/// [`read_enabled`]: Duplex::read_enabled
/// [`take_output`]: Duplex::take_output
/// [`needs_writable_edge`]: Duplex::needs_writable_edge
#[derive(Debug, Default)]
pub struct Duplex {
    input: BytesMut,
    output: BytesMut,
    read_enabled: bool,
    write_enabled: bool,
    write_low_watermark: usize,
}

impl Duplex {
    /// A transport with both directions disabled; the connection enables them
    /// when it begins its first message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes received from the socket.
    pub fn push_input(&mut self, data: &[u8]) {
        self.input.extend_from_slice(data);
    }

    /// Take everything queued for the socket.
    pub fn take_output(&mut self) -> Bytes {
        self.output.split().freeze()
    }

    /// Take at most `max` bytes queued for the socket, for drivers that write
    /// in bounded slices.
    pub fn take_output_up_to(&mut self, max: usize) -> Bytes {
        let len = self.output.len().min(max);
        self.output.split_to(len).freeze()
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn input_is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn output_len(&self) -> usize {
        self.output.len()
    }

    pub fn output_is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn read_enabled(&self) -> bool {
        self.read_enabled
    }

    pub fn write_enabled(&self) -> bool {
        self.write_enabled
    }

    pub fn write_low_watermark(&self) -> usize {
        self.write_low_watermark
    }

    /// Whether the driver should deliver a writable edge: the output buffer
    /// has drained to (or below) the write low-watermark.
    pub fn needs_writable_edge(&self) -> bool {
        self.write_enabled && self.output.len() <= self.write_low_watermark
    }

    pub(crate) fn input_mut(&mut self) -> &mut BytesMut {
        &mut self.input
    }

    pub(crate) fn output_mut(&mut self) -> &mut BytesMut {
        &mut self.output
    }

    pub(crate) fn enable_read(&mut self) {
        self.read_enabled = true;
    }

    pub(crate) fn disable_read(&mut self) {
        self.read_enabled = false;
    }

    pub(crate) fn enable_write(&mut self) {
        self.write_enabled = true;
    }

    pub(crate) fn disable_write(&mut self) {
        self.write_enabled = false;
    }

    pub(crate) fn set_write_low_watermark(&mut self, watermark: usize) {
        self.write_low_watermark = watermark;
    }
}
