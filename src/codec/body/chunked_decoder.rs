use std::cmp;

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::warn;

use crate::codec::body::PayloadItem;
use crate::codec::{read_line, DecodeError};

/// Chunked transfer-encoding, line by line.
///
/// Blank lines before a size line are skipped, which also absorbs the CRLF
/// that terminates each chunk's data. A `;extension` suffix on the size line
/// is ignored. After the zero-size chunk exactly one more line is read;
/// trailers are not supported, so a non-empty line there is discarded with a
/// warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    Size,
    Data { remaining: u64 },
    Terminator,
    End,
}

impl ChunkedDecoder {
    pub fn new() -> Self {
        Self { state: ChunkedState::Size }
    }
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = DecodeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                ChunkedState::Size => {
                    let Some(line) = read_line(src) else { return Ok(None) };
                    if line.is_empty() {
                        continue;
                    }

                    let size = parse_chunk_size(&line)?;
                    self.state = if size == 0 {
                        ChunkedState::Terminator
                    } else {
                        ChunkedState::Data { remaining: size }
                    };
                }

                ChunkedState::Data { remaining } => {
                    if src.is_empty() {
                        return Ok(None);
                    }

                    let len = cmp::min(remaining, src.len() as u64);
                    let bytes = src.split_to(len as usize).freeze();

                    self.state = if len == remaining {
                        ChunkedState::Size
                    } else {
                        ChunkedState::Data { remaining: remaining - len }
                    };
                    return Ok(Some(PayloadItem::Chunk(bytes)));
                }

                ChunkedState::Terminator => {
                    let Some(line) = read_line(src) else { return Ok(None) };
                    if !line.is_empty() {
                        warn!(line = %String::from_utf8_lossy(&line), "ignoring trailer after last chunk");
                    }
                    self.state = ChunkedState::End;
                    return Ok(Some(PayloadItem::Eof));
                }

                ChunkedState::End => return Ok(Some(PayloadItem::Eof)),
            }
        }
    }
}

fn parse_chunk_size(line: &[u8]) -> Result<u64, DecodeError> {
    let invalid = || DecodeError::InvalidChunkSize { line: String::from_utf8_lossy(line).into_owned() };

    let text = std::str::from_utf8(line).map_err(|_| invalid())?;
    let size = match text.split_once(';') {
        Some((size, _extension)) => size,
        None => text,
    };

    u64::from_str_radix(size.trim(), 16).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_chunks_then_terminator() {
        let mut buffer = BytesMut::from(&b"4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"Wiki");

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"pedia");

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
        assert!(buffer.is_empty());
    }

    #[test]
    fn chunk_split_across_feeds() {
        let mut decoder = ChunkedDecoder::new();
        let mut buffer = BytesMut::from(&b"a\r\n01234"[..]);

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"01234");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"56789\r\n0\r\n");
        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"56789");

        // terminator line not buffered yet
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"\r\n");
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn hex_sizes_and_extensions() {
        let mut buffer = BytesMut::from(&b"A;name=value\r\n0123456789\r\n0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"0123456789");
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn leading_blank_lines_skipped() {
        let mut buffer = BytesMut::from(&b"\r\n\r\n2\r\nhi\r\n0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"hi");
    }

    #[test]
    fn trailer_line_discarded() {
        let mut buffer = BytesMut::from(&b"2\r\nhi\r\n0\r\nX-Trailer: 1\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item.bytes().unwrap().as_ref(), b"hi");
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn bad_size_line() {
        let mut buffer = BytesMut::from(&b"zz\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        assert!(matches!(
            decoder.decode(&mut buffer),
            Err(DecodeError::InvalidChunkSize { .. })
        ));
    }
}
