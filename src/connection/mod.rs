mod handler;
mod http_connection;

pub use handler::ConnHandler;
pub use http_connection::{
    HttpConnection, Phase, Role, WriteOutcome, IDLE_CLIENT_TIMEOUT, IDLE_SERVER_TIMEOUT,
    MAX_WRITE_BACKLOG,
};
