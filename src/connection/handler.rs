use bytes::BytesMut;

use crate::connection::HttpConnection;
use crate::protocol::{ConnError, Request, Response};

/// The embedder's side of the engine: one method per callback edge.
///
/// Every method receives the connection so it can invoke verbs mid-callback
/// (query persistence, queue output, pause reading). Only `on_error` must be
/// implemented; the rest default to no-ops, mirroring optional slots in a
/// callback table.
pub trait ConnHandler {
    /// A protocol or transport failure; terminal for the connection. No
    /// further callbacks follow.
    fn on_error(&mut self, conn: &mut HttpConnection, err: ConnError);

    /// An outbound transport finished connecting.
    fn on_connect(&mut self, conn: &mut HttpConnection) {
        let _ = conn;
    }

    /// A request head was parsed on a client-facing connection. The request
    /// owns its header list from here on.
    fn on_client_request(&mut self, conn: &mut HttpConnection, req: Request) {
        let _ = (conn, req);
    }

    /// A response head was parsed on a server-facing connection.
    fn on_server_response(&mut self, conn: &mut HttpConnection, resp: Response) {
        let _ = (conn, resp);
    }

    /// Body bytes are available. The buffer is the connection's scratch
    /// buffer: drain it here, or the bytes pile up into the next delivery.
    fn on_read_body(&mut self, conn: &mut HttpConnection, body: &mut BytesMut) {
        let _ = (conn, body);
    }

    /// The current message's body finished cleanly.
    fn on_msg_complete(&mut self, conn: &mut HttpConnection) {
        let _ = conn;
    }

    /// A choked connection drained below its watermark; `write_buf` may be
    /// called again.
    fn on_write_more(&mut self, conn: &mut HttpConnection) {
        let _ = conn;
    }

    /// The outbound buffer drained to empty.
    fn on_flush(&mut self, conn: &mut HttpConnection) {
        let _ = conn;
    }
}
