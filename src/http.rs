//! HTTP transport seam and the streamed response buffer.

use crate::config::MAX_RESPONSE_BYTES;
use crate::error::TransportError;

/// Blocking HTTP GET collaborator.
///
/// One call performs the whole request: the implementation streams body
/// chunks into `sink` as they arrive and returns the response status code
/// once the stream finishes. Implemented by the ESP-IDF client in the
/// firmware binary and by in-test fakes.
pub trait HttpTransport {
    fn get(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        sink: &mut ResponseBuffer,
    ) -> Result<u16, TransportError>;
}

/// Growable buffer accumulating streamed response chunks.
///
/// Holds the body of the single in-flight request. `take_body` hands the
/// bytes out and releases the allocation, so a failed attempt cannot leak
/// stale bytes into the next fetch window.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    data: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Append one streamed chunk, enforcing the response size cap.
    pub fn append_chunk(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        if self.data.len() + chunk.len() > MAX_RESPONSE_BYTES {
            return Err(TransportError::ResponseTooLarge);
        }
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Take the accumulated body, leaving the buffer empty and unallocated.
    pub fn take_body(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }

    /// Discard any accumulated bytes and release the allocation.
    pub fn reset(&mut self) {
        self.data = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_chunks_in_order() {
        let mut buf = ResponseBuffer::new();
        buf.append_chunk(b"{\"main\":").unwrap();
        buf.append_chunk(b"{}}").unwrap();
        assert_eq!(buf.take_body(), b"{\"main\":{}}");
    }

    #[test]
    fn rejects_bodies_over_the_cap() {
        let mut buf = ResponseBuffer::new();
        let chunk = vec![b'x'; MAX_RESPONSE_BYTES];
        buf.append_chunk(&chunk).unwrap();
        assert!(matches!(
            buf.append_chunk(b"y"),
            Err(TransportError::ResponseTooLarge)
        ));
        // The oversized chunk was refused, not partially appended.
        assert_eq!(buf.len(), MAX_RESPONSE_BYTES);
    }

    #[test]
    fn take_body_releases_the_buffer() {
        let mut buf = ResponseBuffer::new();
        buf.append_chunk(b"abc").unwrap();
        let body = buf.take_body();
        assert_eq!(body, b"abc");
        assert!(buf.is_empty());
        // The buffer is reusable for the next request.
        buf.append_chunk(b"def").unwrap();
        assert_eq!(buf.take_body(), b"def");
    }

    #[test]
    fn reset_discards_partial_bodies() {
        let mut buf = ResponseBuffer::new();
        buf.append_chunk(b"partial").unwrap();
        buf.reset();
        assert!(buf.is_empty());
    }
}
