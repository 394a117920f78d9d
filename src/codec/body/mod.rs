mod chunked_decoder;
mod eof_decoder;
mod length_decoder;
mod payload_decoder;

pub use payload_decoder::{PayloadDecoder, PayloadItem};

pub(crate) use chunked_decoder::ChunkedDecoder;
pub(crate) use eof_decoder::EofDecoder;
pub(crate) use length_decoder::LengthDecoder;
