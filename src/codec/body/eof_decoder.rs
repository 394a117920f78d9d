use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::codec::body::PayloadItem;
use crate::codec::DecodeError;

/// Identity body delimited by transport EOF: everything that arrives belongs
/// to the body. The decoder never produces `Eof` itself; the connection ends
/// the message when the transport reports the close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EofDecoder;

impl Decoder for EofDecoder {
    type Item = PayloadItem;
    type Error = DecodeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        Ok(Some(PayloadItem::Chunk(src.split().freeze())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_everything_available() {
        let mut decoder = EofDecoder;
        let mut buffer = BytesMut::from(&b"partial"[..]);

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"partial");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b" more");
        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b" more");
    }
}
