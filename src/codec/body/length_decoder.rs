use std::cmp;

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::codec::body::PayloadItem;
use crate::codec::DecodeError;

/// Identity body with a known Content-Length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    remaining: u64,
}

impl LengthDecoder {
    pub fn new(length: u64) -> Self {
        Self { remaining: length }
    }
}

impl Decoder for LengthDecoder {
    type Item = PayloadItem;
    type Error = DecodeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.remaining == 0 {
            return Ok(Some(PayloadItem::Eof));
        }

        if src.is_empty() {
            return Ok(None);
        }

        let len = cmp::min(self.remaining, src.len() as u64);
        let bytes = src.split_to(len as usize).freeze();

        self.remaining -= bytes.len() as u64;
        Ok(Some(PayloadItem::Chunk(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_length() {
        let mut buffer = BytesMut::from(&b"hello, worldtrailing"[..]);

        let mut decoder = LengthDecoder::new(12);
        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"hello, world");
        assert_eq!(&buffer[..], b"trailing");

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn streams_partial_input() {
        let mut buffer = BytesMut::from(&b"he"[..]);

        let mut decoder = LengthDecoder::new(5);
        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"he");

        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"llo");
        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"llo");
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }
}
