use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::codec::body::{ChunkedDecoder, EofDecoder, LengthDecoder};
use crate::codec::DecodeError;

/// What a body decoder hands back: a run of body bytes, or the end of the
/// message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem {
    Chunk(Bytes),
    Eof,
}

impl PayloadItem {
    pub fn is_eof(&self) -> bool {
        matches!(self, PayloadItem::Eof)
    }

    pub fn is_chunk(&self) -> bool {
        matches!(self, PayloadItem::Chunk(_))
    }

    pub fn bytes(&self) -> Option<&Bytes> {
        match self {
            PayloadItem::Chunk(bytes) => Some(bytes),
            PayloadItem::Eof => None,
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            PayloadItem::Chunk(bytes) => Some(bytes),
            PayloadItem::Eof => None,
        }
    }
}

/// Streams one message body, whichever framing discipline the headers
/// selected. Built once at header completion and dropped when the message
/// ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadDecoder {
    framing: Framing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Framing {
    /// the body ends after a fixed byte count
    Length(LengthDecoder),
    /// the body arrives as hex-sized chunks
    Chunked(ChunkedDecoder),
    /// the body runs until the peer closes
    UntilEof(EofDecoder),
}

impl PayloadDecoder {
    /// Body sized by a Content-Length value.
    pub fn length(size: u64) -> Self {
        Self { framing: Framing::Length(LengthDecoder::new(size)) }
    }

    /// Body carried as chunked transfer-encoding.
    pub fn chunked() -> Self {
        Self { framing: Framing::Chunked(ChunkedDecoder::new()) }
    }

    /// Body delimited by the peer closing its write side.
    pub fn until_eof() -> Self {
        Self { framing: Framing::UntilEof(EofDecoder) }
    }
}

impl Decoder for PayloadDecoder {
    type Item = PayloadItem;
    type Error = DecodeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match &mut self.framing {
            Framing::Length(inner) => inner.decode(src),
            Framing::Chunked(inner) => inner.decode(src),
            Framing::UntilEof(inner) => inner.decode(src),
        }
    }
}
